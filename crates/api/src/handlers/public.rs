//! Unauthenticated endpoints used by the booking widget.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use stowage_core::reservation::ReservationRequest;
use stowage_db::models::reservation::Reservation;
use stowage_db::models::unit::PublicUnit;
use stowage_db::repositories::UnitRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::intake::submit_reservation;

/// Body returned after a successful booking.
#[derive(Debug, Serialize)]
pub struct ReservationSubmitted {
    pub message: &'static str,
    pub reservation: Reservation,
}

/// POST /api/v1/public/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    AppJson(input): AppJson<ReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationSubmitted>)> {
    let outcome = submit_reservation(&state.pool, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReservationSubmitted {
            message: "Reservation submitted successfully",
            reservation: outcome.reservation,
        }),
    ))
}

/// GET /api/v1/public/units/available
///
/// Bookable units, cheapest first. Client links are not exposed.
pub async fn available_units(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PublicUnit>>>> {
    let units = UnitRepo::list_available(&state.pool).await?;
    Ok(Json(DataResponse { data: units }))
}

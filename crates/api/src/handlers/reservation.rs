//! Admin endpoints for `/admin/reservations`.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use stowage_core::types::DbId;
use stowage_db::models::client::Client;
use stowage_db::models::contract::Contract;
use stowage_db::models::reservation::{Reservation, ReservationWithUnit};
use stowage_db::repositories::ReservationRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::confirmation::confirm_reservation;

/// Body returned by a successful confirmation.
#[derive(Debug, Serialize)]
pub struct ReservationConfirmed {
    pub message: &'static str,
    pub client: Client,
    pub reservation: Reservation,
    pub contract: Contract,
    /// Present when the entities were committed but the audit entry or the
    /// admin notification could not be written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

/// GET /api/v1/admin/reservations
///
/// All reservations, newest first, each with its unit inlined.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ReservationWithUnit>>>> {
    let reservations = ReservationRepo::list_with_units(&state.pool).await?;
    Ok(Json(DataResponse { data: reservations }))
}

/// PUT /api/v1/admin/reservations/{id}/confirm
pub async fn confirm(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReservationConfirmed>> {
    let outcome = confirm_reservation(&state.pool, id, admin.user_id).await?;
    let warning = outcome
        .is_degraded()
        .then_some("Confirmation saved, but the activity log or notification was not recorded");

    Ok(Json(ReservationConfirmed {
        message: "Reservation confirmed, client + contract created, unit assigned, notification sent",
        client: outcome.client,
        reservation: outcome.reservation,
        contract: outcome.contract,
        warning,
    }))
}

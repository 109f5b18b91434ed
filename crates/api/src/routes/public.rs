//! Route definitions for the booking widget.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`. No authentication.
///
/// ```text
/// POST /reservations     -> create_reservation
/// GET  /units/available  -> available_units
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(public::create_reservation))
        .route("/units/available", get(public::available_units))
}

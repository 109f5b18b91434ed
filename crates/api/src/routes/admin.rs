//! Route definitions for `/admin`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reservation;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET /reservations               -> list
/// PUT /reservations/{id}/confirm  -> confirm
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reservations", get(reservation::list))
        .route("/reservations/{id}/confirm", put(reservation::confirm))
}

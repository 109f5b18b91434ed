use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// PATCH  /{id}   -> update_status
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payment::list).post(payment::create))
        .route("/{id}", patch(payment::update_status).delete(payment::delete))
}

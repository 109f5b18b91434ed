//! Route definitions for the `/contracts` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::contract;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /                 -> list (?draft=&clientId=&unitId=)
/// POST   /                 -> create
/// GET    /stats            -> stats
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// PATCH  /{id}/finalize    -> finalize
/// PATCH  /{id}/sign        -> sign
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contract::list).post(contract::create))
        .route("/stats", get(contract::stats))
        .route(
            "/{id}",
            get(contract::get_by_id)
                .put(contract::update)
                .delete(contract::delete),
        )
        .route("/{id}/finalize", patch(contract::finalize))
        .route("/{id}/sign", patch(contract::sign))
}

use axum::routing::get;
use axum::Router;

use crate::handlers::unit;
use crate::state::AppState;

/// Routes mounted at `/units`.
///
/// ```text
/// GET    /                -> list (?status=)
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// GET    /{id}/timeline   -> timeline
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(unit::list).post(unit::create))
        .route(
            "/{id}",
            get(unit::get_by_id).put(unit::update).delete(unit::delete),
        )
        .route("/{id}/timeline", get(unit::timeline))
}

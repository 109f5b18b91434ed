//! Request extractors shared by the handlers.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections (malformed body, wrong field type, missing
/// content type) answer with the usual `{error, code}` 400 body.
///
/// ```ignore
/// pub async fn create(AppJson(input): AppJson<CreateUnit>) -> AppResult<...>
/// ```
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stowage_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `stowage_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: stowage_core::types::DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }
}

/// Body rejections become validation errors, so a malformed payload gets
/// the same `{error, code}` 400 as a missing field.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = classify(&self);

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify(err: &AppError) -> (StatusCode, &'static str, String) {
    match err {
        // --- CoreError variants ---
        AppError::Core(core) => match core {
            CoreError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            CoreError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            CoreError::UnitUnavailable { .. } => (
                StatusCode::BAD_REQUEST,
                "UNIT_UNAVAILABLE",
                "Unit is not available".to_string(),
            ),
            CoreError::InvalidState(msg) => (StatusCode::NOT_FOUND, "INVALID_STATE", msg.clone()),
            CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            CoreError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            CoreError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal core error");
                internal()
            }
        },

        // --- Database errors ---
        AppError::Database(err) => classify_sqlx_error(err),

        // --- HTTP-specific errors ---
        AppError::InternalError(msg) => {
            tracing::error!(error = %msg, "Internal error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on a `uq_*` constraint map to 409.
/// - Foreign-key violations on a `fk_*` constraint map to 409 (the row is
///   still referenced, or references something that is gone).
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique_violation
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // PostgreSQL foreign_key_violation
                Some("23503") if constraint.starts_with("fk_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Operation violates reference constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_unavailable_is_bad_request() {
        let err = AppError::Core(CoreError::UnitUnavailable {
            unit_id: 7,
            status: "rented".into(),
        });
        let (status, code, message) = classify(&err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "UNIT_UNAVAILABLE");
        assert_eq!(message, "Unit is not available");
    }

    #[test]
    fn invalid_state_is_not_found() {
        let err = AppError::Core(CoreError::InvalidState("no unit".into()));
        assert_eq!(classify(&err).0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_is_409() {
        let err = AppError::Core(CoreError::Conflict("already confirmed".into()));
        assert_eq!(classify(&err).0, StatusCode::CONFLICT);
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = AppError::InternalError("connection string postgres://secret".into());
        let (status, _, message) = classify(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }

    #[test]
    fn row_not_found_is_404() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(classify(&err).0, StatusCode::NOT_FOUND);
    }
}

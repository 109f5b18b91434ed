//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stowage_core::error::CoreError;
use stowage_core::notification::NotificationRecipient;
use stowage_core::roles::ROLE_CLIENT;
use stowage_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: DbId,
    /// `admin`, `staff`, or `client`.
    pub role: String,
    /// Linked client record, for `client`-role accounts.
    pub client_id: Option<DbId>,
}

impl AuthUser {
    /// Which notification inbox this caller reads.
    ///
    /// Client-role accounts read their client's inbox; everyone else reads
    /// their own. A client account without a linked client has no inbox.
    pub fn inbox(&self) -> Result<NotificationRecipient, AppError> {
        if self.role == ROLE_CLIENT {
            self.client_id
                .map(NotificationRecipient::Client)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Forbidden(
                        "Account is not linked to a client".into(),
                    ))
                })
        } else {
            Ok(NotificationRecipient::User(self.user_id))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            client_id: claims.client_id,
        })
    }
}

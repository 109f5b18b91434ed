//! Role gates for handlers.
//!
//! | Extractor        | Roles            | Used by                                              |
//! |------------------|------------------|------------------------------------------------------|
//! | [`RequireStaff`] | `staff`, `admin` | units, clients, contracts, payments                  |
//! | [`RequireAdmin`] | `admin`          | reservation review and confirmation, client deletion |
//!
//! `client`-role accounts pass neither gate. They reach `/public`, `/auth`
//! and their own inbox through plain [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stowage_core::error::CoreError;
use stowage_core::roles::{is_back_office, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Caller holding the `admin` role.
///
/// ```ignore
/// pub async fn confirm(RequireAdmin(admin): RequireAdmin, ...) -> AppResult<...>
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, |role| role == ROLE_ADMIN, "Admin role required")
            .await
            .map(RequireAdmin)
    }
}

/// Caller with back-office access, see [`is_back_office`].
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, is_back_office, "Staff or Admin role required")
            .await
            .map(RequireStaff)
    }
}

/// Authenticate, then 403 unless `allowed` accepts the caller's role.
/// A missing or bad token is still a 401 from [`AuthUser`].
async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: fn(&str) -> bool,
    denial: &'static str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if allowed(&user.role) {
        return Ok(user);
    }
    tracing::debug!(user_id = user.user_id, role = %user.role, uri = %parts.uri, "Role gate refused");
    Err(AppError::Core(CoreError::Forbidden(denial.into())))
}

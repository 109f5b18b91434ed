//! Startup seeding of the first administrator account.

use sqlx::PgPool;
use stowage_core::roles::ROLE_ADMIN;
use stowage_db::models::user::{CreateUser, User};
use stowage_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin unless a user with that email already exists.
///
/// Returns the new user, or `None` when nothing had to be created.
pub async fn ensure_bootstrap_admin(
    pool: &PgPool,
    admin: &BootstrapAdmin,
) -> AppResult<Option<User>> {
    let email = admin.email.to_lowercase();
    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        tracing::debug!(email = %email, "Bootstrap admin already present");
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let username = email.split('@').next().unwrap_or("admin").to_string();

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username,
            email,
            password_hash,
            role: ROLE_ADMIN.to_string(),
            client_id: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(Some(user))
}

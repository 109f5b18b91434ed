//! Handlers for the `/clients` resource.
//!
//! Every mutation appends an activity entry in the same transaction as the
//! change itself.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stowage_core::activity::{
    self, ACTIVITY_CLIENT_CREATED, ACTIVITY_CLIENT_DELETED, ACTIVITY_CLIENT_UPDATED,
};
use stowage_core::error::CoreError;
use stowage_core::types::DbId;
use stowage_db::models::activity::{Activity, CreateActivity};
use stowage_db::models::client::{Client, ClientDetail, CreateClient, UpdateClient};
use stowage_db::repositories::{ActivityRepo, ClientRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_create(input: &CreateClient) -> Result<(), CoreError> {
    let mut missing = Vec::new();
    if input.name.trim().is_empty() {
        missing.push("name");
    }
    if input.email.trim().is_empty() {
        missing.push("email");
    }
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }
    if !input.email.contains('@') {
        return Err(CoreError::Validation("Invalid fields: email".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/v1/clients
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/clients/{id}
///
/// The client with its contracts, units and payments.
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClientDetail>>> {
    let detail = ClientRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Client", id))?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/clients/{id}/activities
pub async fn activities(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Activity>>>> {
    if ClientRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("Client", id));
    }
    let entries = ActivityRepo::list_for_client(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/clients
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    validate_create(&input)?;

    let mut tx = state.pool.begin().await?;
    let client = ClientRepo::create(&mut *tx, &input).await?;
    ActivityRepo::create(
        &mut *tx,
        &CreateActivity {
            user_id: Some(user.user_id),
            client_id: Some(client.id),
            kind: ACTIVITY_CLIENT_CREATED.to_string(),
            details: activity::client_created(&client.name),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(client_id = client.id, user_id = user.user_id, "Client created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be blank".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;
    let client = ClientRepo::update(&mut *tx, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Client", id))?;
    ActivityRepo::create(
        &mut *tx,
        &CreateActivity {
            user_id: Some(user.user_id),
            client_id: Some(client.id),
            kind: ACTIVITY_CLIENT_UPDATED.to_string(),
            details: activity::client_updated(&client.name),
        },
    )
    .await?;
    tx.commit().await?;

    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/clients/{id}
///
/// Admin only. Clients with contracts or payments are refused with 409.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let client = ClientRepo::delete(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Client", id))?;
    // The row is gone, so the entry cannot reference it.
    ActivityRepo::create(
        &mut *tx,
        &CreateActivity {
            user_id: Some(admin.user_id),
            client_id: None,
            kind: ACTIVITY_CLIENT_DELETED.to_string(),
            details: activity::client_deleted(&client.name),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(client_id = id, user_id = admin.user_id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn input(name: &str, email: &str) -> CreateClient {
        CreateClient {
            name: name.into(),
            email: email.into(),
            phone: None,
            notes: None,
        }
    }

    #[test]
    fn blank_name_and_email_are_reported_together() {
        assert_matches!(
            validate_create(&input(" ", "")),
            Err(CoreError::Validation(msg)) if msg == "Missing required fields: name, email"
        );
    }

    #[test]
    fn email_needs_an_at_sign() {
        assert_matches!(validate_create(&input("Jane", "jane")), Err(CoreError::Validation(_)));
        assert!(validate_create(&input("Jane", "jane@x.com")).is_ok());
    }
}

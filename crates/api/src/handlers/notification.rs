//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`] and operate on the
//! caller's inbox (see [`AuthUser::inbox`]). Rows belonging to another inbox
//! answer 404.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stowage_core::error::CoreError;
use stowage_core::notification::{NotificationRecipient, NotificationTemplate, DEFAULT_KIND};
use stowage_core::roles::is_back_office;
use stowage_core::types::DbId;
use stowage_db::models::notification::{CreateNotification, Notification, NotificationFilter};
use stowage_db::repositories::{ClientRepo, NotificationRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::{DataResponse, PaginatedResponse, Pagination};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// If `true`, return only unread notifications.
    pub unread: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedRead {
    pub marked_read: u64,
}

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<PaginatedResponse<Notification>>> {
    let inbox = auth.inbox()?;
    let (page, limit, offset) = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .resolve();
    let filter = NotificationFilter {
        kind: params.kind.filter(|k| !k.is_empty()),
        unread_only: params.unread.unwrap_or(false),
    };

    let data =
        NotificationRepo::list_for_recipient(&state.pool, inbox, &filter, limit, offset).await?;
    let total = NotificationRepo::count_for_recipient(&state.pool, inbox, &filter).await?;

    Ok(Json(PaginatedResponse {
        data,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.inbox()?).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// POST /api/v1/notifications
///
/// Manual notification. Back-office callers may address a client with
/// `clientId`; otherwise the notification lands in the caller's own inbox.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNotification>,
) -> AppResult<(StatusCode, Json<DataResponse<Notification>>)> {
    let title = input.title.as_deref().map(str::trim).unwrap_or_default();
    let message = input.message.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() || message.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title and message are required".into(),
        )));
    }

    let recipient = match input.client_id {
        Some(client_id) if is_back_office(&auth.role) => {
            ClientRepo::find_by_id(&state.pool, client_id)
                .await?
                .ok_or_else(|| AppError::not_found("Client", client_id))?;
            NotificationRecipient::Client(client_id)
        }
        _ => auth.inbox()?,
    };

    let mut template = NotificationTemplate::new(
        title,
        message,
        input.kind.as_deref().filter(|k| !k.is_empty()).unwrap_or(DEFAULT_KIND),
    );
    template.related_entity = input.related_entity;
    if let NotificationRecipient::Client(client_id) = recipient {
        template = template.client(client_id);
    }

    let notification = NotificationRepo::create(&state.pool, recipient, &template).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: notification })))
}

/// PUT /api/v1/notifications/{id}/read
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = NotificationRepo::mark_read(&state.pool, auth.inbox()?, id)
        .await?
        .ok_or_else(|| AppError::not_found("Notification", id))?;
    Ok(Json(DataResponse { data: notification }))
}

/// PUT /api/v1/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = NotificationRepo::mark_all_read(&state.pool, auth.inbox()?).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}

/// DELETE /api/v1/notifications/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if NotificationRepo::delete(&state.pool, auth.inbox()?, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Notification", id))
    }
}

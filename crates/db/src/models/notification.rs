//! Notification model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stowage_core::error::CoreError;
use stowage_core::notification::NotificationRecipient;
use stowage_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: DbId,
    pub recipient_user_id: Option<DbId>,
    pub recipient_client_id: Option<DbId>,
    pub client_id: Option<DbId>,
    pub reservation_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub payment_id: Option<DbId>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub related_entity: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Notification {
    pub fn recipient(&self) -> Result<NotificationRecipient, CoreError> {
        NotificationRecipient::from_columns(self.recipient_user_id, self.recipient_client_id)
    }
}

/// Filters for listing a recipient's notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub kind: Option<String>,
    pub unread_only: bool,
}

/// DTO for `POST /notifications`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotification {
    pub client_id: Option<DbId>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub related_entity: Option<String>,
}

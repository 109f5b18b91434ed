//! Activity (audit trail) model.

use serde::Serialize;
use sqlx::FromRow;
use stowage_core::types::{DbId, Timestamp};

/// A row from the `activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub client_id: Option<DbId>,
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending an activity.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub user_id: Option<DbId>,
    pub client_id: Option<DbId>,
    pub kind: String,
    pub details: String,
}

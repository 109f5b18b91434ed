//! Payment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stowage_core::types::{DbId, Timestamp};

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: DbId,
    pub client_id: DbId,
    pub unit_id: DbId,
    pub amount: f64,
    pub status: String,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a payment. Status starts as `pending`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub client_id: Option<DbId>,
    pub unit_id: Option<DbId>,
    pub amount: Option<f64>,
}

/// DTO for `PATCH /payments/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayment {
    pub status: Option<String>,
    pub paid_at: Option<Timestamp>,
}

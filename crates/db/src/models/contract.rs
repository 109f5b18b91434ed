//! Rental contract model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stowage_core::types::{Date, DbId, Timestamp};

/// A row from the `contracts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: DbId,
    pub client_id: DbId,
    pub unit_id: DbId,
    pub reservation_id: Option<DbId>,
    pub monthly_rate: f64,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub title: String,
    pub content: String,
    pub draft: bool,
    pub signed: bool,
    pub signed_by: Option<DbId>,
    pub signed_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO shared by the manual endpoint and reservation confirmation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContract {
    pub client_id: DbId,
    pub unit_id: DbId,
    /// Set only when the contract is promoted from a reservation.
    #[serde(skip)]
    pub reservation_id: Option<DbId>,
    pub monthly_rate: f64,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Defaults to `true`.
    pub draft: Option<bool>,
}

/// DTO for updating a contract. All fields are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContract {
    pub title: Option<String>,
    pub content: Option<String>,
    pub monthly_rate: Option<f64>,
    pub end_date: Option<Date>,
    pub draft: Option<bool>,
}

/// Filters accepted by `GET /contracts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFilter {
    pub draft: Option<bool>,
    pub client_id: Option<DbId>,
    pub unit_id: Option<DbId>,
}

/// Contract counts for the dashboard. Drafts are not active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContractStats {
    pub total: i64,
    pub active: i64,
    pub drafts: i64,
}

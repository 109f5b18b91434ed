//! Storage unit model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stowage_core::error::CoreError;
use stowage_core::status::UnitStatus;
use stowage_core::types::{DbId, Timestamp};

/// A row from the `units` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: DbId,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub monthly_rate: f64,
    pub status: String,
    pub client_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub address_street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Unit {
    /// Typed view of the `status` column.
    pub fn unit_status(&self) -> Result<UnitStatus, CoreError> {
        self.status.parse()
    }
}

/// Public projection of an available unit for the booking widget.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUnit {
    pub id: DbId,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub monthly_rate: f64,
    pub status: String,
    pub address_street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// DTO for creating a unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnit {
    #[serde(rename = "type")]
    pub unit_type: String,
    pub monthly_rate: f64,
    /// Defaults to `available`.
    pub status: Option<String>,
    pub client_id: Option<DbId>,
    pub address_street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// DTO for updating a unit. All fields are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnit {
    #[serde(rename = "type")]
    pub unit_type: Option<String>,
    pub monthly_rate: Option<f64>,
    pub status: Option<String>,
    pub client_id: Option<DbId>,
    pub address_street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One entry of a unit's merged history.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub created_at: Timestamp,
    pub detail: String,
}

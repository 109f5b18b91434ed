//! Client entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stowage_core::types::{DbId, Timestamp};

use super::contract::Contract;
use super::payment::Payment;
use super::unit::Unit;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub has_paid: bool,
    pub has_keys: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A client with the records the dashboard shows on its detail page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,
    pub contracts: Vec<Contract>,
    pub units: Vec<Unit>,
    pub payments: Vec<Payment>,
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an existing client. All fields are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub has_paid: Option<bool>,
    pub has_keys: Option<bool>,
}

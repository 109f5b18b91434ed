//! Public reservation model.

use serde::Serialize;
use sqlx::FromRow;
use stowage_core::error::CoreError;
use stowage_core::status::ReservationStatus;
use stowage_core::types::{Date, DbId, Timestamp};

use super::unit::Unit;

/// A row from the `reservations` table.
///
/// `unit_id` becomes `NULL` when the unit is deleted; such a reservation can
/// no longer be confirmed.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: DbId,
    pub unit_id: Option<DbId>,
    pub location: String,
    #[serde(rename = "type")]
    pub booking_type: String,
    pub size: String,
    pub entry_date: Date,
    pub goods_value: String,
    pub postal_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// Typed view of the `status` column.
    pub fn reservation_status(&self) -> Result<ReservationStatus, CoreError> {
        self.status.parse()
    }

    /// `"<first> <last>"`, used as the client name on confirmation.
    pub fn full_name(&self) -> String {
        stowage_core::reservation::full_name(&self.first_name, &self.last_name)
    }
}

/// A reservation with its unit included, as listed on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationWithUnit {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub unit: Option<Unit>,
}

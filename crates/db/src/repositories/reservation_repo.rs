//! Repository for the `reservations` table.

use std::collections::HashMap;

use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use stowage_core::reservation::ReservationIntake;
use stowage_core::types::DbId;

use crate::models::reservation::{Reservation, ReservationWithUnit};
use crate::repositories::UnitRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, unit_id, location, booking_type, size, entry_date, goods_value, \
                       postal_code, first_name, last_name, email, phone, status, \
                       created_at, updated_at";

/// Provides persistence for public booking requests.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a validated booking as a `pending` reservation.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        intake: &ReservationIntake,
    ) -> Result<Reservation, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservations (unit_id, location, booking_type, size, entry_date,
                                       goods_value, postal_code, first_name, last_name,
                                       email, phone)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(intake.unit_id)
            .bind(&intake.location)
            .bind(&intake.booking_type)
            .bind(&intake.size)
            .bind(intake.entry_date)
            .bind(&intake.goods_value)
            .bind(&intake.postal_code)
            .bind(&intake.first_name)
            .bind(&intake.last_name)
            .bind(&intake.email)
            .bind(&intake.phone)
            .fetch_one(executor)
            .await
    }

    /// Find a reservation by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a reservation and lock it for the rest of the transaction.
    ///
    /// Concurrent confirmations of the same reservation serialize here.
    pub async fn find_by_id_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// All reservations, newest first, each with its unit (if it still exists).
    pub async fn list_with_units(pool: &PgPool) -> Result<Vec<ReservationWithUnit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations ORDER BY created_at DESC, id DESC");
        let reservations = sqlx::query_as::<_, Reservation>(&query)
            .fetch_all(pool)
            .await?;

        let mut unit_ids: Vec<DbId> = reservations.iter().filter_map(|r| r.unit_id).collect();
        unit_ids.sort_unstable();
        unit_ids.dedup();

        let units: HashMap<DbId, _> = UnitRepo::find_by_ids(pool, &unit_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(reservations
            .into_iter()
            .map(|reservation| {
                let unit = reservation.unit_id.and_then(|id| units.get(&id).cloned());
                ReservationWithUnit { reservation, unit }
            })
            .collect())
    }

    /// Flip a `pending` reservation to `confirmed`.
    ///
    /// Returns `None` when the reservation is missing or was already
    /// confirmed, so a lost race never confirms twice.
    pub async fn mark_confirmed<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "UPDATE reservations SET status = 'confirmed'
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}

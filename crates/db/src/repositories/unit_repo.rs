//! Repository for the `units` table.

use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use stowage_core::status::UnitStatus;
use stowage_core::types::DbId;

use crate::models::unit::{CreateUnit, PublicUnit, TimelineEntry, Unit, UpdateUnit};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, unit_type, monthly_rate, status, client_id, created_by, \
                       address_street, city, province, country, postal_code, latitude, longitude, \
                       created_at, updated_at";

/// Columns exposed to the public booking widget.
const PUBLIC_COLUMNS: &str = "id, unit_type, monthly_rate, status, address_street, city, \
                              province, country, postal_code, latitude, longitude";

/// Provides CRUD operations and status transitions for units.
pub struct UnitRepo;

impl UnitRepo {
    /// Insert a new unit, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateUnit,
        created_by: Option<DbId>,
    ) -> Result<Unit, sqlx::Error> {
        let query = format!(
            "INSERT INTO units (unit_type, monthly_rate, status, client_id, created_by,
                                address_street, city, province, country, postal_code,
                                latitude, longitude)
             VALUES ($1, $2, COALESCE($3, 'available'), $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(&input.unit_type)
            .bind(input.monthly_rate)
            .bind(&input.status)
            .bind(input.client_id)
            .bind(created_by)
            .bind(&input.address_street)
            .bind(&input.city)
            .bind(&input.province)
            .bind(&input.country)
            .bind(&input.postal_code)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(executor)
            .await
    }

    /// Find a unit by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units WHERE id = $1");
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a unit and lock its row until the surrounding transaction ends.
    ///
    /// Must be called with a transaction connection; on a bare pool the lock
    /// is released as soon as the statement completes.
    pub async fn find_by_id_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find several units at once (order unspecified).
    pub async fn find_by_ids<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units WHERE id = ANY($1)");
        sqlx::query_as::<_, Unit>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// List units, optionally restricted to one status, newest first.
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        status: Option<UnitStatus>,
    ) -> Result<Vec<Unit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM units
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(status.map(UnitStatus::as_str))
            .fetch_all(executor)
            .await
    }

    /// Units currently attached to a client.
    pub async fn list_for_client<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
    ) -> Result<Vec<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units WHERE client_id = $1 ORDER BY id");
        sqlx::query_as::<_, Unit>(&query)
            .bind(client_id)
            .fetch_all(executor)
            .await
    }

    /// Available units for the public widget, cheapest first.
    pub async fn list_available<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<PublicUnit>, sqlx::Error> {
        let query = format!(
            "SELECT {PUBLIC_COLUMNS} FROM units
             WHERE status = 'available'
             ORDER BY monthly_rate ASC, id ASC"
        );
        sqlx::query_as::<_, PublicUnit>(&query)
            .fetch_all(executor)
            .await
    }

    /// Update a unit. Only non-`None` fields in `input` are applied.
    ///
    /// Moving a unit to `available` detaches its client.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateUnit,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!(
            "UPDATE units SET
                unit_type = COALESCE($2, unit_type),
                monthly_rate = COALESCE($3, monthly_rate),
                status = COALESCE($4, status),
                client_id = CASE
                    WHEN $4 = 'available' THEN NULL
                    ELSE COALESCE($5, client_id)
                END,
                address_street = COALESCE($6, address_street),
                city = COALESCE($7, city),
                province = COALESCE($8, province),
                country = COALESCE($9, country),
                postal_code = COALESCE($10, postal_code),
                latitude = COALESCE($11, latitude),
                longitude = COALESCE($12, longitude)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .bind(&input.unit_type)
            .bind(input.monthly_rate)
            .bind(&input.status)
            .bind(input.client_id)
            .bind(&input.address_street)
            .bind(&input.city)
            .bind(&input.province)
            .bind(&input.country)
            .bind(&input.postal_code)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_optional(executor)
            .await
    }

    /// Compare-and-swap the status of a unit.
    ///
    /// Returns `None` when the unit does not exist or is not in `from`.
    pub async fn transition_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        from: UnitStatus,
        to: UnitStatus,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!(
            "UPDATE units SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Attach a client and set the status in one statement.
    ///
    /// Returns `None` when the unit is missing or already belongs to a
    /// different client.
    pub async fn assign_client<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        client_id: DbId,
        status: UnitStatus,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!(
            "UPDATE units SET client_id = $2, status = $3
             WHERE id = $1 AND (client_id IS NULL OR client_id = $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .bind(client_id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Release a unit back to `available` and detach its client.
    pub async fn release<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!(
            "UPDATE units SET status = 'available', client_id = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a unit. Returns `true` if a row was removed.
    ///
    /// Pending reservations keep their row with `unit_id = NULL`; contracts
    /// and payments block the deletion with a foreign-key violation.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Merged history of a unit: payments, contracts, and notifications
    /// addressed to its current client, newest first.
    pub async fn timeline(pool: &PgPool, id: DbId) -> Result<Vec<TimelineEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimelineEntry>(
            "SELECT 'payment' AS entry_type, p.created_at,
                    'Payment of $' || p.amount::TEXT || ' (' || p.status || ')' AS detail
               FROM payments p WHERE p.unit_id = $1
             UNION ALL
             SELECT 'contract', c.created_at,
                    'Contract: ' || c.title || ' (' ||
                    CASE WHEN c.signed THEN 'signed' WHEN c.draft THEN 'draft' ELSE 'final' END
                    || ')'
               FROM contracts c WHERE c.unit_id = $1
             UNION ALL
             SELECT 'notification', n.created_at, n.title || ': ' || n.message
               FROM notifications n
               JOIN units u ON u.client_id = n.recipient_client_id
              WHERE u.id = $1
             ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}

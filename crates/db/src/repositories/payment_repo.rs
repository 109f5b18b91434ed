//! Repository for the `payments` table.

use sqlx::postgres::PgExecutor;
use stowage_core::status::PaymentStatus;
use stowage_core::types::{DbId, Timestamp};

use crate::models::payment::Payment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, unit_id, amount, status, paid_at, created_at, updated_at";

/// Provides CRUD operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a `pending` payment.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
        unit_id: DbId,
        amount: f64,
    ) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (client_id, unit_id, amount)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(client_id)
            .bind(unit_id)
            .bind(amount)
            .fetch_one(executor)
            .await
    }

    /// All payments, newest first.
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Payment>(&query).fetch_all(executor).await
    }

    /// Payments made by one client, newest first.
    pub async fn list_for_client<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE client_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(client_id)
            .fetch_all(executor)
            .await
    }

    /// Set the status. `paid_at` defaults to now when moving to `paid`
    /// and is cleared for any other status.
    pub async fn update_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        status: PaymentStatus,
        paid_at: Option<Timestamp>,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET
                status = $2,
                paid_at = CASE WHEN $2 = 'paid' THEN COALESCE($3, paid_at, NOW()) ELSE NULL END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(paid_at)
            .fetch_optional(executor)
            .await
    }

    /// Delete a payment. Returns `true` if a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

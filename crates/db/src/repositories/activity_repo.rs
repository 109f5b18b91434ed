//! Repository for the append-only `activities` table.

use sqlx::postgres::PgExecutor;
use stowage_core::types::DbId;

use crate::models::activity::{Activity, CreateActivity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, client_id, kind, details, created_at, updated_at";

pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateActivity,
    ) -> Result<Activity, sqlx::Error> {
        let query = format!(
            "INSERT INTO activities (user_id, client_id, kind, details)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(input.user_id)
            .bind(input.client_id)
            .bind(&input.kind)
            .bind(&input.details)
            .fetch_one(executor)
            .await
    }

    /// Audit entries mentioning a client, newest first.
    pub async fn list_for_client<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities WHERE client_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(client_id)
            .fetch_all(executor)
            .await
    }
}

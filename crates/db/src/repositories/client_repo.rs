//! Repository for the `clients` table.

use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use stowage_core::types::DbId;

use crate::models::client::{Client, ClientDetail, CreateClient, UpdateClient};
use crate::repositories::{ContractRepo, PaymentRepo, UnitRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, notes, has_paid, has_keys, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateClient,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, email, phone, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.notes)
            .fetch_one(executor)
            .await
    }

    /// Find a client by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Oldest client whose email matches, case-insensitively.
    pub async fn find_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients WHERE lower(email) = lower($1) ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// List all clients, most recently created first.
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Client>(&query).fetch_all(executor).await
    }

    /// Load a client together with its contracts, units, and payments.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ClientDetail>, sqlx::Error> {
        let Some(client) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let contracts = ContractRepo::list_for_client(pool, id).await?;
        let units = UnitRepo::list_for_client(pool, id).await?;
        let payments = PaymentRepo::list_for_client(pool, id).await?;
        Ok(Some(ClientDetail {
            client,
            contracts,
            units,
            payments,
        }))
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                notes = COALESCE($5, notes),
                has_paid = COALESCE($6, has_paid),
                has_keys = COALESCE($7, has_keys)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.notes)
            .bind(input.has_paid)
            .bind(input.has_keys)
            .fetch_optional(executor)
            .await
    }

    /// Delete a client, returning the deleted row.
    ///
    /// Fails with a foreign-key violation while contracts or payments still
    /// reference the client.
    pub async fn delete<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("DELETE FROM clients WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}

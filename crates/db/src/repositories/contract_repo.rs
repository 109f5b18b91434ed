//! Repository for the `contracts` table.

use sqlx::postgres::PgExecutor;
use stowage_core::types::DbId;

use crate::models::contract::{
    Contract, ContractFilter, ContractStats, CreateContract, UpdateContract,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, unit_id, reservation_id, monthly_rate, start_date, end_date, \
                       title, content, draft, signed, signed_by, signed_at, created_by, \
                       created_at, updated_at";

/// Provides CRUD operations and lifecycle transitions for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract, returning the created row.
    ///
    /// A second contract for the same reservation violates
    /// `uq_contracts_reservation_id`.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateContract,
        created_by: Option<DbId>,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts (client_id, unit_id, reservation_id, monthly_rate,
                                    start_date, end_date, title, content, draft, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, true), $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(input.client_id)
            .bind(input.unit_id)
            .bind(input.reservation_id)
            .bind(input.monthly_rate)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.draft)
            .bind(created_by)
            .fetch_one(executor)
            .await
    }

    /// Find a contract by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List contracts matching the filter, newest first.
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        filter: &ContractFilter,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts
             WHERE ($1::BOOLEAN IS NULL OR draft = $1)
               AND ($2::BIGINT IS NULL OR client_id = $2)
               AND ($3::BIGINT IS NULL OR unit_id = $3)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(filter.draft)
            .bind(filter.client_id)
            .bind(filter.unit_id)
            .fetch_all(executor)
            .await
    }

    /// Contracts belonging to one client, newest first.
    pub async fn list_for_client<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        Self::list(
            executor,
            &ContractFilter {
                client_id: Some(client_id),
                ..ContractFilter::default()
            },
        )
        .await
    }

    /// Update a contract. Only non-`None` fields in `input` are applied.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                monthly_rate = COALESCE($4, monthly_rate),
                end_date = COALESCE($5, end_date),
                draft = COALESCE($6, draft)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.monthly_rate)
            .bind(input.end_date)
            .bind(input.draft)
            .fetch_optional(executor)
            .await
    }

    /// Mark a draft contract final. Returns `None` unless it was a draft.
    pub async fn finalize<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET draft = false
             WHERE id = $1 AND draft = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Sign a finalized contract. Returns `None` unless it was final and
    /// unsigned.
    pub async fn sign<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        signed_by: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET signed = true, signed_by = $2, signed_at = NOW()
             WHERE id = $1 AND draft = false AND signed = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(signed_by)
            .fetch_optional(executor)
            .await
    }

    /// Delete a contract, returning the deleted row.
    pub async fn delete<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("DELETE FROM contracts WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Whether another contract still references the unit.
    pub async fn exists_for_unit<'e>(
        executor: impl PgExecutor<'e>,
        unit_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM contracts WHERE unit_id = $1)")
            .bind(unit_id)
            .fetch_one(executor)
            .await
    }

    /// Totals for the dashboard.
    pub async fn stats<'e>(executor: impl PgExecutor<'e>) -> Result<ContractStats, sqlx::Error> {
        let (total, active, drafts): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE draft = false),
                    COUNT(*) FILTER (WHERE draft = true)
             FROM contracts",
        )
        .fetch_one(executor)
        .await?;
        Ok(ContractStats {
            total,
            active,
            drafts,
        })
    }
}

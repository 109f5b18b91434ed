//! Handlers for the `/contracts` resource.
//!
//! ```text
//! create    unit available -> assigned, client attached
//! finalize  draft -> final
//! sign      final -> signed, unit assigned -> rented
//! delete    unit released to available once no contract references it
//! ```
//!
//! Every mutation notifies the acting user in the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgConnection;
use stowage_core::error::CoreError;
use stowage_core::notification::{self, ContractEvent, NotificationRecipient};
use stowage_core::status::UnitStatus;
use stowage_core::types::DbId;
use stowage_db::models::contract::{
    Contract, ContractFilter, ContractStats, CreateContract, UpdateContract,
};
use stowage_db::repositories::{ClientRepo, ContractRepo, UnitRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::fanout;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateContract) -> Result<(), CoreError> {
    if input.title.trim().is_empty() {
        return Err(CoreError::Validation("Missing required fields: title".into()));
    }
    validate_rate(input.monthly_rate)?;
    if input.end_date.is_some_and(|end| end < input.start_date) {
        return Err(CoreError::Validation(
            "endDate must not be before startDate".into(),
        ));
    }
    Ok(())
}

fn validate_rate(rate: f64) -> Result<(), CoreError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "monthlyRate must be a non-negative number".into(),
        ))
    }
}

/// Notify `actor` about `event` on `contract`, on the caller's transaction.
async fn notify_actor(
    conn: &mut PgConnection,
    actor: DbId,
    event: ContractEvent,
    contract: &Contract,
) -> AppResult<()> {
    let client_name = ClientRepo::find_by_id(&mut *conn, contract.client_id)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();
    let template = notification::contract_changed(
        event,
        contract.id,
        contract.client_id,
        &contract.title,
        &client_name,
    );
    fanout::notify(conn, NotificationRecipient::User(actor), &template).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/v1/contracts
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(filter): Query<ContractFilter>,
) -> AppResult<Json<DataResponse<Vec<Contract>>>> {
    let contracts = ContractRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: contracts }))
}

/// GET /api/v1/contracts/stats
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ContractStats>>> {
    let stats = ContractRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/contracts/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let contract = ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Contract", id))?;
    Ok(Json(DataResponse { data: contract }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/contracts
///
/// The unit must be `available`; it becomes `assigned` to the contract's
/// client in the same transaction.
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateContract>,
) -> AppResult<(StatusCode, Json<DataResponse<Contract>>)> {
    validate_create(&input)?;

    let mut tx = state.pool.begin().await?;

    let unit = UnitRepo::find_by_id_for_update(&mut *tx, input.unit_id)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", input.unit_id))?;
    let status = unit.unit_status()?;
    if status != UnitStatus::Available {
        return Err(CoreError::UnitUnavailable {
            unit_id: unit.id,
            status: status.to_string(),
        }
        .into());
    }
    ClientRepo::find_by_id(&mut *tx, input.client_id)
        .await?
        .ok_or_else(|| AppError::not_found("Client", input.client_id))?;

    let contract = ContractRepo::create(&mut *tx, &input, Some(user.user_id)).await?;
    UnitRepo::assign_client(&mut *tx, unit.id, input.client_id, UnitStatus::Assigned)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Unit #{} already belongs to another client",
                unit.id
            )))
        })?;
    notify_actor(&mut tx, user.user_id, ContractEvent::Created, &contract).await?;

    tx.commit().await?;

    tracing::info!(
        contract_id = contract.id,
        unit_id = contract.unit_id,
        client_id = contract.client_id,
        user_id = user.user_id,
        "Contract created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: contract })))
}

/// PUT /api/v1/contracts/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateContract>,
) -> AppResult<Json<DataResponse<Contract>>> {
    if let Some(rate) = input.monthly_rate {
        validate_rate(rate)?;
    }
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "title must not be blank".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;

    let current = ContractRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Contract", id))?;
    if current.signed && input.draft == Some(true) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Contract #{id} is signed and cannot return to draft"
        ))));
    }
    if input.end_date.is_some_and(|end| end < current.start_date) {
        return Err(AppError::Core(CoreError::Validation(
            "endDate must not be before startDate".into(),
        )));
    }

    let contract = ContractRepo::update(&mut *tx, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Contract", id))?;
    notify_actor(&mut tx, user.user_id, ContractEvent::Updated, &contract).await?;

    tx.commit().await?;
    Ok(Json(DataResponse { data: contract }))
}

/// PATCH /api/v1/contracts/{id}/finalize
pub async fn finalize(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let mut tx = state.pool.begin().await?;

    let Some(contract) = ContractRepo::finalize(&mut *tx, id).await? else {
        return match ContractRepo::find_by_id(&mut *tx, id).await? {
            Some(_) => Err(AppError::Core(CoreError::Conflict(format!(
                "Contract #{id} is already finalized"
            )))),
            None => Err(AppError::not_found("Contract", id)),
        };
    };
    notify_actor(&mut tx, user.user_id, ContractEvent::Finalized, &contract).await?;

    tx.commit().await?;
    tracing::info!(contract_id = id, user_id = user.user_id, "Contract finalized");
    Ok(Json(DataResponse { data: contract }))
}

/// PATCH /api/v1/contracts/{id}/sign
///
/// Only finalized, unsigned contracts can be signed. The unit moves to
/// `rented`.
pub async fn sign(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let mut tx = state.pool.begin().await?;

    let current = ContractRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Contract", id))?;
    if current.draft {
        return Err(AppError::Core(CoreError::Validation(
            "Contract must be finalized before signing".into(),
        )));
    }
    if current.signed {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Contract #{id} is already signed"
        ))));
    }

    let unit = UnitRepo::find_by_id_for_update(&mut *tx, current.unit_id)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", current.unit_id))?;
    let unit_status = unit.unit_status()?;
    if unit_status != UnitStatus::Rented {
        unit_status.ensure_transition(UnitStatus::Rented)?;
        UnitRepo::transition_status(&mut *tx, unit.id, unit_status, UnitStatus::Rented)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Unit {} changed status while locked", unit.id))
            })?;
    }

    let contract = ContractRepo::sign(&mut *tx, id, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Contract #{id} is already signed"
            )))
        })?;
    notify_actor(&mut tx, user.user_id, ContractEvent::Signed, &contract).await?;

    tx.commit().await?;
    tracing::info!(
        contract_id = id,
        unit_id = unit.id,
        user_id = user.user_id,
        "Contract signed"
    );
    Ok(Json(DataResponse { data: contract }))
}

/// DELETE /api/v1/contracts/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;

    let contract = ContractRepo::delete(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Contract", id))?;
    let released = !ContractRepo::exists_for_unit(&mut *tx, contract.unit_id).await?;
    if released {
        UnitRepo::release(&mut *tx, contract.unit_id).await?;
    }
    notify_actor(&mut tx, user.user_id, ContractEvent::Deleted, &contract).await?;

    tx.commit().await?;
    tracing::info!(
        contract_id = id,
        unit_id = contract.unit_id,
        unit_released = released,
        user_id = user.user_id,
        "Contract deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use super::*;

    fn input() -> CreateContract {
        CreateContract {
            client_id: 1,
            unit_id: 2,
            reservation_id: None,
            monthly_rate: 150.0,
            start_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            end_date: None,
            title: "Storage agreement".into(),
            content: String::new(),
            draft: None,
        }
    }

    #[test]
    fn valid_contract_passes() {
        assert!(validate_create(&input()).is_ok());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut contract = input();
        contract.end_date = NaiveDate::from_ymd_opt(2026, 10, 1);
        assert_matches!(validate_create(&contract), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut contract = input();
        contract.title = "  ".into();
        assert_matches!(
            validate_create(&contract),
            Err(CoreError::Validation(msg)) if msg.contains("title")
        );
    }
}

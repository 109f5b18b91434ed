//! Handlers for the `/payments` resource. Back-office only.
//!
//! Recording a payment, and moving one to `paid` or `overdue`, notifies the
//! paying client in the same transaction.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stowage_core::error::CoreError;
use stowage_core::notification::{self, NotificationRecipient};
use stowage_core::status::PaymentStatus;
use stowage_core::types::DbId;
use stowage_db::models::payment::{CreatePayment, Payment, UpdatePayment};
use stowage_db::repositories::{ClientRepo, PaymentRepo, UnitRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::fanout;

/// A payment request with every field present and the amount checked.
#[derive(Debug, PartialEq)]
struct ValidPayment {
    client_id: DbId,
    unit_id: DbId,
    amount: f64,
}

fn validate_create(input: &CreatePayment) -> Result<ValidPayment, CoreError> {
    let (Some(client_id), Some(unit_id), Some(amount)) =
        (input.client_id, input.unit_id, input.amount)
    else {
        let missing: Vec<&str> = [
            ("clientId", input.client_id.is_none()),
            ("unitId", input.unit_id.is_none()),
            ("amount", input.amount.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        return Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };
    if !(amount.is_finite() && amount > 0.0) {
        return Err(CoreError::Validation(
            "amount must be greater than zero".into(),
        ));
    }
    Ok(ValidPayment {
        client_id,
        unit_id,
        amount,
    })
}

/// GET /api/v1/payments
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let payments = PaymentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: payments }))
}

/// POST /api/v1/payments
///
/// The unit must currently belong to the paying client.
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePayment>,
) -> AppResult<(StatusCode, Json<DataResponse<Payment>>)> {
    let valid = validate_create(&input)?;

    let mut tx = state.pool.begin().await?;

    ClientRepo::find_by_id(&mut *tx, valid.client_id)
        .await?
        .ok_or_else(|| AppError::not_found("Client", valid.client_id))?;
    let unit = UnitRepo::find_by_id(&mut *tx, valid.unit_id)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", valid.unit_id))?;
    if unit.client_id != Some(valid.client_id) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unit #{} does not belong to client #{}",
            unit.id, valid.client_id
        ))));
    }

    let payment = PaymentRepo::create(&mut *tx, valid.client_id, unit.id, valid.amount).await?;
    let template =
        notification::payment_recorded(payment.id, payment.client_id, payment.amount, &unit.unit_type);
    fanout::notify(&mut tx, NotificationRecipient::Client(payment.client_id), &template).await?;

    tx.commit().await?;

    tracing::info!(
        payment_id = payment.id,
        client_id = payment.client_id,
        unit_id = payment.unit_id,
        user_id = user.user_id,
        "Payment recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

/// PATCH /api/v1/payments/{id}
///
/// Change the status. `paidAt` is honoured only for `paid` and defaults to
/// now.
pub async fn update_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdatePayment>,
) -> AppResult<Json<DataResponse<Payment>>> {
    let status: PaymentStatus = input
        .status
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Validation("Missing required fields: status".into())))?
        .parse()?;

    let mut tx = state.pool.begin().await?;

    let payment = PaymentRepo::update_status(&mut *tx, id, status, input.paid_at)
        .await?
        .ok_or_else(|| AppError::not_found("Payment", id))?;
    if let Some(template) =
        notification::payment_status_changed(payment.id, payment.client_id, payment.amount, status)
    {
        fanout::notify(&mut tx, NotificationRecipient::Client(payment.client_id), &template)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(payment_id = id, status = %status, user_id = user.user_id, "Payment updated");
    Ok(Json(DataResponse { data: payment }))
}

/// DELETE /api/v1/payments/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PaymentRepo::delete(&state.pool, id).await? {
        tracing::info!(payment_id = id, user_id = user.user_id, "Payment deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Payment", id))
    }
}

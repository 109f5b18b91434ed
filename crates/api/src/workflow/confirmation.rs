//! Reservation confirmation.
//!
//! ```text
//! lock reservation, lock unit
//! 1. create client from the reservation's contact fields
//! 2. attach client to unit, status -> assigned
//! 3. reservation pending -> confirmed (compare-and-swap)
//! 4. create draft contract
//! commit
//! 5. activity entry          } second transaction, best effort:
//! 6. notify acting admin     } failure is logged, not rolled back
//! ```

use sqlx::PgPool;
use stowage_core::activity::{self, ACTIVITY_RESERVATION_CONFIRMED};
use stowage_core::error::CoreError;
use stowage_core::notification::{self, NotificationRecipient};
use stowage_core::status::UnitStatus;
use stowage_core::types::DbId;
use stowage_db::models::activity::CreateActivity;
use stowage_db::models::client::{Client, CreateClient};
use stowage_db::models::contract::{Contract, CreateContract};
use stowage_db::models::reservation::Reservation;
use stowage_db::models::unit::Unit;
use stowage_db::repositories::{
    ActivityRepo, ClientRepo, ContractRepo, ReservationRepo, UnitRepo,
};

use super::fanout;
use crate::error::{AppError, AppResult};

/// Whether the audit entry and admin notification were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Recorded {
        activity_id: DbId,
        notification_id: DbId,
    },
    /// The core entities are committed but the audit trail or notification
    /// is missing. Already logged.
    Failed,
}

/// Everything a confirmation produced.
#[derive(Debug)]
pub struct ConfirmationOutcome {
    pub client: Client,
    pub unit: Unit,
    pub reservation: Reservation,
    pub contract: Contract,
    pub follow_up: FollowUp,
}

impl ConfirmationOutcome {
    pub fn is_degraded(&self) -> bool {
        self.follow_up == FollowUp::Failed
    }
}

/// Promote a pending reservation into a client, an assigned unit, and a draft
/// contract, on behalf of `admin_id`.
///
/// Errors:
/// - `NotFound` when the reservation does not exist.
/// - `InvalidState` when its unit was deleted.
/// - `Conflict` when it is already confirmed, or the unit was given to
///   someone else in the meantime.
pub async fn confirm_reservation(
    pool: &PgPool,
    reservation_id: DbId,
    admin_id: DbId,
) -> AppResult<ConfirmationOutcome> {
    let mut tx = pool.begin().await?;

    let pending = ReservationRepo::find_by_id_for_update(&mut *tx, reservation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation", reservation_id))?;
    pending.reservation_status()?.ensure_confirmable(reservation_id)?;

    let unit_id = pending.unit_id.ok_or_else(|| missing_unit(reservation_id))?;
    let unit = UnitRepo::find_by_id_for_update(&mut *tx, unit_id)
        .await?
        .ok_or_else(|| missing_unit(reservation_id))?;
    unit.unit_status()?.ensure_transition(UnitStatus::Assigned)?;

    let client_name = pending.full_name();

    // 1. Client
    let client = ClientRepo::create(
        &mut *tx,
        &CreateClient {
            name: client_name.clone(),
            email: pending.email.clone(),
            phone: Some(pending.phone.clone()),
            notes: Some(format!("Created from reservation #{reservation_id}")),
        },
    )
    .await?;

    // 2. Unit
    let unit = UnitRepo::assign_client(&mut *tx, unit.id, client.id, UnitStatus::Assigned)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Unit #{unit_id} already belongs to another client"
            )))
        })?;

    // 3. Reservation
    let reservation = ReservationRepo::mark_confirmed(&mut *tx, reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Reservation #{reservation_id} is already confirmed"
            )))
        })?;

    // 4. Contract
    let contract = ContractRepo::create(
        &mut *tx,
        &CreateContract {
            client_id: client.id,
            unit_id: unit.id,
            reservation_id: Some(reservation_id),
            monthly_rate: unit.monthly_rate,
            start_date: reservation.entry_date,
            end_date: None,
            title: format!("Contract for {client_name}"),
            content: format!("Auto-generated draft contract for reservation #{reservation_id}."),
            draft: Some(true),
        },
        Some(admin_id),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        reservation_id,
        unit_id = unit.id,
        client_id = client.id,
        contract_id = contract.id,
        admin_id,
        "Reservation confirmed"
    );

    let follow_up = match record_follow_up(pool, admin_id, &reservation, &client, &contract).await
    {
        Ok(follow_up) => follow_up,
        Err(e) => {
            tracing::error!(
                error = %e,
                reservation_id,
                client_id = client.id,
                contract_id = contract.id,
                "Reservation confirmed but audit entry or notification failed"
            );
            FollowUp::Failed
        }
    };

    Ok(ConfirmationOutcome {
        client,
        unit,
        reservation,
        contract,
        follow_up,
    })
}

/// Steps 5 and 6: audit trail and acting-admin notification.
async fn record_follow_up(
    pool: &PgPool,
    admin_id: DbId,
    reservation: &Reservation,
    client: &Client,
    contract: &Contract,
) -> Result<FollowUp, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let activity = ActivityRepo::create(
        &mut *tx,
        &CreateActivity {
            user_id: Some(admin_id),
            client_id: Some(client.id),
            kind: ACTIVITY_RESERVATION_CONFIRMED.to_string(),
            details: activity::reservation_confirmed(
                reservation.id,
                &client.name,
                contract.unit_id,
                contract.id,
            ),
        },
    )
    .await?;

    let template =
        notification::reservation_confirmed(reservation.id, client.id, &client.name, contract.id);
    let notification =
        fanout::notify(&mut tx, NotificationRecipient::User(admin_id), &template).await?;

    tx.commit().await?;

    Ok(FollowUp::Recorded {
        activity_id: activity.id,
        notification_id: notification.id,
    })
}

fn missing_unit(reservation_id: DbId) -> AppError {
    AppError::Core(CoreError::InvalidState(format!(
        "Reservation #{reservation_id} has no linked unit"
    )))
}

//! Public reservation intake.

use sqlx::PgPool;
use stowage_core::error::CoreError;
use stowage_core::notification;
use stowage_core::reservation::ReservationRequest;
use stowage_core::status::UnitStatus;
use stowage_db::models::reservation::Reservation;
use stowage_db::repositories::{ReservationRepo, UnitRepo};

use super::fanout;
use crate::error::{AppError, AppResult};

/// Result of a successful booking.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub reservation: Reservation,
    pub admins_notified: usize,
}

/// Validate a booking, record it as `pending`, hold the unit, and tell every
/// admin.
///
/// All writes share one transaction: either the reservation exists, the
/// unit is `reserved` and the admin notifications are written, or nothing
/// changed. The unit row is locked first, so two bookings for the same unit
/// serialize and the loser sees it as unavailable.
pub async fn submit_reservation(
    pool: &PgPool,
    request: ReservationRequest,
) -> AppResult<IntakeOutcome> {
    let intake = request.into_intake()?;

    let mut tx = pool.begin().await?;

    let unit = UnitRepo::find_by_id_for_update(&mut *tx, intake.unit_id)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", intake.unit_id))?;

    let status = unit.unit_status()?;
    if status != UnitStatus::Available {
        tracing::info!(unit_id = unit.id, status = %status, "Booking refused, unit not available");
        return Err(CoreError::UnitUnavailable {
            unit_id: unit.id,
            status: status.to_string(),
        }
        .into());
    }

    let reservation = ReservationRepo::create(&mut *tx, &intake).await?;

    UnitRepo::transition_status(&mut *tx, unit.id, UnitStatus::Available, UnitStatus::Reserved)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("Unit {} changed status while locked", unit.id))
        })?;

    let template = notification::reservation_received(
        reservation.id,
        unit.id,
        &intake.full_name(),
        &intake.booking_type,
        &intake.size,
        intake.entry_date,
    );
    let notified = fanout::notify_admins(&mut tx, &template).await?;

    tx.commit().await?;

    tracing::info!(
        reservation_id = reservation.id,
        unit_id = unit.id,
        admin_count = notified.len(),
        "Reservation received"
    );

    Ok(IntakeOutcome {
        reservation,
        admins_notified: notified.len(),
    })
}

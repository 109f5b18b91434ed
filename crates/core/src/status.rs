//! Status machines for units, reservations, and payments.
//!
//! Statuses are persisted as lowercase `TEXT` columns guarded by `CHECK`
//! constraints; these enums are the typed view used by workflows when they
//! decide whether a transition is legal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Unit status
// ---------------------------------------------------------------------------

/// Lifecycle of a storage unit.
///
/// ```text
/// available -> reserved -> assigned -> rented
/// available -------------> assigned
/// (any) -> available        explicit release (contract deletion, admin update)
/// (any) <-> maintenance     admin update only
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    /// Free to book.
    Available,
    /// Held by a pending public reservation.
    Reserved,
    /// Attached to a client with a draft or unsigned contract.
    Assigned,
    /// A signed contract is in force.
    Rented,
    /// Withdrawn from booking by staff.
    Maintenance,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 5] = [
        UnitStatus::Available,
        UnitStatus::Reserved,
        UnitStatus::Assigned,
        UnitStatus::Rented,
        UnitStatus::Maintenance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnitStatus::Available => "available",
            UnitStatus::Reserved => "reserved",
            UnitStatus::Assigned => "assigned",
            UnitStatus::Rented => "rented",
            UnitStatus::Maintenance => "maintenance",
        }
    }

    /// Whether a workflow (not an admin override) may move a unit from
    /// `self` to `next`.
    pub fn can_transition_to(self, next: UnitStatus) -> bool {
        use UnitStatus::*;
        matches!(
            (self, next),
            (Available, Reserved)
                | (Available, Assigned)
                | (Reserved, Assigned)
                | (Assigned, Rented)
                | (Reserved, Available)
                | (Assigned, Available)
                | (Rented, Available)
        )
    }

    /// Fail with [`CoreError::Conflict`] unless the transition is allowed.
    pub fn ensure_transition(self, next: UnitStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Unit cannot move from '{self}' to '{next}'"
            )))
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid unit status '{s}'. Must be one of: available, reserved, assigned, rented, maintenance"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Reservation status
// ---------------------------------------------------------------------------

/// A reservation is confirmed at most once; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
        }
    }

    /// Check that a reservation in this status may be confirmed.
    pub fn ensure_confirmable(self, reservation_id: crate::types::DbId) -> Result<(), CoreError> {
        match self {
            ReservationStatus::Pending => Ok(()),
            ReservationStatus::Confirmed => Err(CoreError::Conflict(format!(
                "Reservation #{reservation_id} is already confirmed"
            ))),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            other => Err(CoreError::Validation(format!(
                "Invalid reservation status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Payment status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "overdue" => Ok(PaymentStatus::Overdue),
            other => Err(CoreError::Validation(format!(
                "Invalid payment status '{other}'. Must be one of: pending, paid, overdue"
            ))),
        }
    }
}

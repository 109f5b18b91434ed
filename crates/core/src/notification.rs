//! Notification recipients, kinds, and message templates.
//!
//! A notification is addressed to exactly one party: a back-office user or
//! a client. Storage keeps two nullable columns with a `CHECK` that exactly
//! one is set; code works with [`NotificationRecipient`] instead.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::PaymentStatus;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// The party a notification row is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum NotificationRecipient {
    /// A user account (admin or staff).
    User(DbId),
    /// A client record, read through the client's linked user account.
    Client(DbId),
}

impl NotificationRecipient {
    /// Split into the `(recipient_user_id, recipient_client_id)` column pair.
    pub fn columns(self) -> (Option<DbId>, Option<DbId>) {
        match self {
            NotificationRecipient::User(id) => (Some(id), None),
            NotificationRecipient::Client(id) => (None, Some(id)),
        }
    }

    /// Rebuild from the column pair. Exactly one side must be set.
    pub fn from_columns(
        user_id: Option<DbId>,
        client_id: Option<DbId>,
    ) -> Result<Self, CoreError> {
        match (user_id, client_id) {
            (Some(id), None) => Ok(NotificationRecipient::User(id)),
            (None, Some(id)) => Ok(NotificationRecipient::Client(id)),
            _ => Err(CoreError::Internal(
                "Notification must have exactly one recipient".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

pub const KIND_INFO: &str = "info";
pub const KIND_SUCCESS: &str = "success";
pub const KIND_WARNING: &str = "warning";
pub const KIND_ERROR: &str = "error";
pub const KIND_RESERVATION: &str = "reservation";
pub const KIND_CONTRACT_CREATED: &str = "contract_created";
pub const KIND_CONTRACT_UPDATED: &str = "contract_updated";
pub const KIND_CONTRACT_FINALIZED: &str = "contract_finalized";
pub const KIND_CONTRACT_SIGNED: &str = "contract_signed";
pub const KIND_CONTRACT_DELETED: &str = "contract_deleted";

/// Related-entity labels stored alongside the typed links.
pub const ENTITY_RESERVATION: &str = "reservation";
pub const ENTITY_CONTRACT: &str = "contract";
pub const ENTITY_PAYMENT: &str = "payment";

/// Default kind for manually created notifications.
pub const DEFAULT_KIND: &str = KIND_INFO;

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Shared content for one fan-out: every recipient gets an identical copy
/// apart from the recipient columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationTemplate {
    pub title: String,
    pub message: String,
    pub kind: String,
    pub related_entity: Option<String>,
    pub client_id: Option<DbId>,
    pub reservation_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub payment_id: Option<DbId>,
}

impl NotificationTemplate {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: &str) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: kind.to_string(),
            ..Self::default()
        }
    }

    pub fn related(mut self, entity: &str) -> Self {
        self.related_entity = Some(entity.to_string());
        self
    }

    pub fn client(mut self, client_id: DbId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn reservation(mut self, reservation_id: DbId) -> Self {
        self.reservation_id = Some(reservation_id);
        self
    }

    pub fn contract(mut self, contract_id: DbId) -> Self {
        self.contract_id = Some(contract_id);
        self
    }

    pub fn payment(mut self, payment_id: DbId) -> Self {
        self.payment_id = Some(payment_id);
        self
    }
}

/// Sent to every admin when the public widget books a unit.
pub fn reservation_received(
    reservation_id: DbId,
    unit_id: DbId,
    full_name: &str,
    booking_type: &str,
    size: &str,
    entry_date: Date,
) -> NotificationTemplate {
    NotificationTemplate::new(
        format!("New reservation from {full_name}"),
        format!(
            "Reservation for unit #{unit_id} ({booking_type}, {size}) on {}",
            entry_date.format("%Y-%m-%d")
        ),
        KIND_RESERVATION,
    )
    .related(ENTITY_RESERVATION)
    .reservation(reservation_id)
}

/// Sent to the admin who confirmed a reservation.
pub fn reservation_confirmed(
    reservation_id: DbId,
    client_id: DbId,
    client_name: &str,
    contract_id: DbId,
) -> NotificationTemplate {
    NotificationTemplate::new(
        "Reservation Confirmed",
        format!(
            "Reservation #{reservation_id} confirmed → Client {client_name}, Contract #{contract_id} created."
        ),
        KIND_SUCCESS,
    )
    .related(ENTITY_RESERVATION)
    .client(client_id)
    .reservation(reservation_id)
    .contract(contract_id)
}

/// What happened to a contract, for the acting user's feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractEvent {
    Created,
    Updated,
    Finalized,
    Signed,
    Deleted,
}

/// Sent to the user who changed a contract.
pub fn contract_changed(
    event: ContractEvent,
    contract_id: DbId,
    client_id: DbId,
    contract_title: &str,
    client_name: &str,
) -> NotificationTemplate {
    let (kind, title, message) = match event {
        ContractEvent::Created => (
            KIND_CONTRACT_CREATED,
            "New Contract",
            format!("Contract \"{contract_title}\" created for {client_name}"),
        ),
        ContractEvent::Updated => (
            KIND_CONTRACT_UPDATED,
            "Contract Updated",
            format!("Contract \"{contract_title}\" updated"),
        ),
        ContractEvent::Finalized => (
            KIND_CONTRACT_FINALIZED,
            "Contract Finalized",
            format!("Contract \"{contract_title}\" finalized"),
        ),
        ContractEvent::Signed => (
            KIND_CONTRACT_SIGNED,
            "Contract Signed",
            format!("Contract \"{contract_title}\" signed"),
        ),
        ContractEvent::Deleted => (
            KIND_CONTRACT_DELETED,
            "Contract Deleted",
            format!("Contract #{contract_id} deleted"),
        ),
    };
    let template = NotificationTemplate::new(title, message, kind)
        .related(ENTITY_CONTRACT)
        .client(client_id);
    // A deleted contract cannot be linked.
    if event == ContractEvent::Deleted {
        template
    } else {
        template.contract(contract_id)
    }
}

/// Sent to a client when a payment is recorded against one of their units.
pub fn payment_recorded(
    payment_id: DbId,
    client_id: DbId,
    amount: f64,
    unit_type: &str,
) -> NotificationTemplate {
    NotificationTemplate::new(
        "New Payment Created",
        format!("A new payment of ${amount:.2} has been created for unit {unit_type}."),
        KIND_INFO,
    )
    .related(ENTITY_PAYMENT)
    .client(client_id)
    .payment(payment_id)
}

/// Sent to a client when a payment becomes `paid` or `overdue`. Other
/// statuses produce no notification.
pub fn payment_status_changed(
    payment_id: DbId,
    client_id: DbId,
    amount: f64,
    status: PaymentStatus,
) -> Option<NotificationTemplate> {
    let (title, message, kind) = match status {
        PaymentStatus::Paid => (
            "Payment Received",
            format!("Your payment of ${amount:.2} has been received."),
            KIND_SUCCESS,
        ),
        PaymentStatus::Overdue => (
            "Payment Overdue",
            format!("Your payment of ${amount:.2} is overdue."),
            KIND_WARNING,
        ),
        PaymentStatus::Pending => return None,
    };
    Some(
        NotificationTemplate::new(title, message, kind)
            .related(ENTITY_PAYMENT)
            .client(client_id)
            .payment(payment_id),
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn recipient_columns_round_trip() {
        for recipient in [NotificationRecipient::User(3), NotificationRecipient::Client(9)] {
            let (user, client) = recipient.columns();
            assert_eq!(
                NotificationRecipient::from_columns(user, client).unwrap(),
                recipient
            );
        }
    }

    #[test]
    fn recipient_requires_exactly_one_side() {
        assert_matches!(
            NotificationRecipient::from_columns(None, None),
            Err(CoreError::Internal(_))
        );
        assert_matches!(
            NotificationRecipient::from_columns(Some(1), Some(2)),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn recipient_serializes_tagged() {
        let json = serde_json::to_value(NotificationRecipient::Client(5)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "client", "id": 5}));
    }

    #[test]
    fn reservation_received_mentions_unit_and_booking() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let tpl = reservation_received(12, 7, "Jane Doe", "particular", "3-4m2", date);
        assert_eq!(tpl.title, "New reservation from Jane Doe");
        assert_eq!(tpl.message, "Reservation for unit #7 (particular, 3-4m2) on 2026-11-01");
        assert_eq!(tpl.kind, KIND_RESERVATION);
        assert_eq!(tpl.reservation_id, Some(12));
        assert_eq!(tpl.client_id, None);
    }

    #[test]
    fn contract_deletion_is_not_linked_to_the_gone_row() {
        let tpl = contract_changed(ContractEvent::Deleted, 8, 4, "Storage", "Jane Doe");
        assert_eq!(tpl.kind, KIND_CONTRACT_DELETED);
        assert_eq!(tpl.contract_id, None);
        assert_eq!(tpl.client_id, Some(4));

        let tpl = contract_changed(ContractEvent::Signed, 8, 4, "Storage", "Jane Doe");
        assert_eq!(tpl.contract_id, Some(8));
        assert_eq!(tpl.message, "Contract \"Storage\" signed");
    }

    #[test]
    fn payment_status_notifications() {
        let paid = payment_status_changed(1, 2, 150.0, PaymentStatus::Paid).unwrap();
        assert_eq!(paid.kind, KIND_SUCCESS);
        assert_eq!(paid.message, "Your payment of $150.00 has been received.");

        let overdue = payment_status_changed(1, 2, 150.0, PaymentStatus::Overdue).unwrap();
        assert_eq!(overdue.kind, KIND_WARNING);

        assert!(payment_status_changed(1, 2, 150.0, PaymentStatus::Pending).is_none());
    }

    #[test]
    fn reservation_confirmed_links_everything() {
        let tpl = reservation_confirmed(12, 4, "Jane Doe", 30);
        assert_eq!(tpl.kind, KIND_SUCCESS);
        assert_eq!(tpl.client_id, Some(4));
        assert_eq!(tpl.reservation_id, Some(12));
        assert_eq!(tpl.contract_id, Some(30));
        assert!(tpl.message.contains("Client Jane Doe"));
    }
}

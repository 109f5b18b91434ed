//! Activity (audit trail) type tags and detail strings.

use crate::types::DbId;

pub const ACTIVITY_CLIENT_CREATED: &str = "client_created";
pub const ACTIVITY_CLIENT_UPDATED: &str = "client_updated";
pub const ACTIVITY_CLIENT_DELETED: &str = "client_deleted";
pub const ACTIVITY_RESERVATION_CONFIRMED: &str = "reservation_confirmed";

pub fn client_created(name: &str) -> String {
    format!("Client {name} was added.")
}

pub fn client_updated(name: &str) -> String {
    format!("Client {name} was updated.")
}

pub fn client_deleted(name: &str) -> String {
    format!("Client {name} was deleted.")
}

pub fn reservation_confirmed(
    reservation_id: DbId,
    client_name: &str,
    unit_id: DbId,
    contract_id: DbId,
) -> String {
    format!(
        "Reservation {reservation_id} confirmed → Client {client_name}, Unit {unit_id}, Contract {contract_id}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_details_name_all_entities() {
        let details = reservation_confirmed(5, "Jane Doe", 7, 11);
        assert_eq!(
            details,
            "Reservation 5 confirmed → Client Jane Doe, Unit 7, Contract 11."
        );
    }
}

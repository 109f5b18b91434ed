//! Well-known role name constants.
//!
//! These must match the `chk_users_role` constraint in the users migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_CLIENT: &str = "client";

/// All roles a user row may carry.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_STAFF, ROLE_CLIENT];

/// Whether the role may use the back-office endpoints (units, clients,
/// contracts, payments).
pub fn is_back_office(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_STAFF
}

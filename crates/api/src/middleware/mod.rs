//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a Bearer JWT.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireStaff`] -- requires `staff` or `admin`.

pub mod auth;
pub mod rbac;

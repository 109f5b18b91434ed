//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! JSON uses camelCase to match the dashboard and the booking widget.

pub mod activity;
pub mod client;
pub mod contract;
pub mod notification;
pub mod payment;
pub mod reservation;
pub mod session;
pub mod unit;
pub mod user;

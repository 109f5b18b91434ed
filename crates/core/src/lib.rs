//! Domain types and pure logic for the storage-rental backend.
//!
//! Nothing in this crate touches the database or the network: status
//! machines, intake validation, notification recipients, and message
//! templates live here so the repository and HTTP layers can share them.

pub mod activity;
pub mod error;
pub mod notification;
pub mod reservation;
pub mod roles;
pub mod status;
pub mod types;

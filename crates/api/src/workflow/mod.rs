//! Multi-step operations that span several tables.
//!
//! - [`intake`] -- public booking: reservation row, unit hold, admin fan-out.
//! - [`confirmation`] -- promote a pending reservation into client, unit
//!   assignment, and draft contract.
//! - [`fanout`] -- one notification row per recipient.
//!
//! Each workflow owns its transaction boundary. Handlers stay thin and only
//! translate between HTTP and these functions.

pub mod confirmation;
pub mod fanout;
pub mod intake;

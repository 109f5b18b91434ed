//! Request handlers, one submodule per resource.
//!
//! Handlers are thin: they extract the caller and input, delegate to a
//! repository or a [`crate::workflow`] function, and map errors via
//! [`crate::error::AppError`].

pub mod auth;
pub mod client;
pub mod contract;
pub mod notification;
pub mod payment;
pub mod public;
pub mod reservation;
pub mod unit;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Single-statement methods accept any [`sqlx::postgres::PgExecutor`], so
//! they run equally against `&PgPool` or inside a transaction
//! (`&mut *tx`). Methods that need several statements take `&PgPool` and
//! open their own transaction.

pub mod activity_repo;
pub mod client_repo;
pub mod contract_repo;
pub mod notification_repo;
pub mod payment_repo;
pub mod reservation_repo;
pub mod session_repo;
pub mod unit_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use client_repo::ClientRepo;
pub use contract_repo::ContractRepo;
pub use notification_repo::NotificationRepo;
pub use payment_repo::PaymentRepo;
pub use reservation_repo::ReservationRepo;
pub use session_repo::SessionRepo;
pub use unit_repo::UnitRepo;
pub use user_repo::UserRepo;

//! sea-orm entities for the library database.
//!
//! Enumerated columns (`role`, `status`, `transaction_status`) are stored as
//! their wire strings; convert with the `lectern-domain` enums.

pub mod admin_events;
pub mod annotations;
pub mod banners;
pub mod categories;
pub mod ebooks;
pub mod reading_logs;
pub mod reading_progress;
pub mod readlists;
pub mod subscriptions;
pub mod transactions;
pub mod users;

//! Typed data-access client for the library database.
//!
//! [`LibraryClient`] hands out one [`Delegate`] per model through
//! [`ModelAccess`]. Interactive transactions run a callback against a
//! [`TxClient`], which exposes the same delegates bound to the open
//! transaction.

pub mod aggregate;
pub mod args;
pub mod client;
pub mod delegate;
pub mod error;
pub mod raw;
pub mod transaction;

pub use aggregate::{AggregateArgs, AggregateRow, GroupByArgs};
pub use args::FindArgs;
pub use client::{LibraryClient, ModelAccess, TxClient};
pub use delegate::Delegate;
pub use error::DataError;
pub use raw::Raw;
pub use transaction::TransactionOptions;

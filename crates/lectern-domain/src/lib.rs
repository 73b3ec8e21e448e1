//! Domain types shared across all Lectern crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Enumerations carry their database/JSON wire strings; those strings are a
//! stable contract and must not change.

pub mod ebook;
pub mod error;
pub mod pagination;
pub mod reading;
pub mod subscription;
pub mod user;

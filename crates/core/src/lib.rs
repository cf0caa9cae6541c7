//! Domain models and reconciliation engine for viasync.
//!
//! Two independently evolved lineages of the same road-damage reporting
//! product store the same real-world entity under different schemas: the
//! mobile/citizen lineage (French vocabulary, Firestore) and the admin
//! lineage (English vocabulary, SQL). This crate owns both domain models,
//! the field mapper between them, duplicate detection, and the sync engine
//! that drives source-to-target import passes. Store implementations live in
//! the `viasync-connect` and `viasync-storage-sqlite` crates.

pub mod errors;
pub mod reports;
pub mod sync;

pub use errors::{Error, Result};

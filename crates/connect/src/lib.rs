//! Firestore REST client for the mobile report lineage.
//!
//! The mobile app stores citizen damage reports in a Firestore collection;
//! this crate reads (and writes) that collection over the Firestore REST API
//! and exposes it as the sync engine's source store.

mod client;
mod error;
mod firestore;

pub use client::{FirestoreClient, DEFAULT_REPORTS_COLLECTION};
pub use error::{ConnectError, Result};
pub use firestore::{
    decode_damage_report, encode_new_damage_report, ArrayValue, FirestoreDocument, FirestoreValue,
    MapValue,
};

//! SQLite persistence for the admin report lineage.
//!
//! Implements the sync engine's target store (the `reports` table) and the
//! watermark/settings store (`app_settings`) over a diesel/r2d2 pool with
//! embedded migrations.

pub mod db;
pub mod errors;
pub mod reports;
pub mod schema;
pub mod settings;

pub use db::{create_pool, get_connection, run_migrations, DbConnection, DbPool};
pub use errors::StorageError;
pub use reports::ReportRepository;
pub use settings::SettingsRepository;

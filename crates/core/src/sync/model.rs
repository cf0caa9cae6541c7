//! Sync run results, stats, and watermark constants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settings key under which the last-sync watermark is persisted.
pub const LAST_SYNC_SETTING_KEY: &str = "last_sync_date";

/// Outcome of one orchestration run. Immutable once returned; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub success: bool,
    pub message: String,
    pub imported: usize,
    pub updated: usize,
    /// One formatted entry per failed record, in processing order.
    pub errors: Vec<String>,
}

impl SyncResult {
    /// Result for a pass that processed every source record. Success only
    /// when the error list is empty; nonzero counts with errors still report
    /// failure.
    pub fn completed(imported: usize, updated: usize, errors: Vec<String>) -> Self {
        let message = format!(
            "Sync complete: {} imported, {} updated, {} errors",
            imported,
            updated,
            errors.len()
        );
        Self {
            success: errors.is_empty(),
            message,
            imported,
            updated,
            errors,
        }
    }

    /// Result for a run aborted before any record was processed.
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            errors: vec![message.clone()],
            message,
            imported: 0,
            updated: 0,
        }
    }
}

/// Read-only aggregate over both stores, for dashboards and monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub total_source_records: usize,
    pub total_target_records: usize,
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Source records created strictly after the watermark; full source
    /// count when no watermark exists.
    pub pending_count: usize,
}

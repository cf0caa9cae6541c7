//! Read-only sync statistics for dashboards.

use std::sync::Arc;

use crate::errors::Result;
use crate::sync::model::SyncStats;
use crate::sync::stores::{SourceReportStore, TargetReportStore, WatermarkStore};

/// Aggregate view over both stores. Purely informational; never drives the
/// engine's decisions and never writes the watermark.
pub struct SyncStatsService {
    source: Arc<dyn SourceReportStore>,
    target: Arc<dyn TargetReportStore>,
    watermarks: Arc<dyn WatermarkStore>,
}

impl SyncStatsService {
    pub fn new(
        source: Arc<dyn SourceReportStore>,
        target: Arc<dyn TargetReportStore>,
        watermarks: Arc<dyn WatermarkStore>,
    ) -> Self {
        Self {
            source,
            target,
            watermarks,
        }
    }

    /// Record counts on both sides, the watermark, and how many source
    /// records were created strictly after it (all of them when no watermark
    /// exists yet).
    pub async fn get_stats(&self) -> Result<SyncStats> {
        let source_reports = self.source.fetch_all().await?;
        let target_reports = self.target.fetch_all().await?;
        let last_sync_at = self.watermarks.load()?;

        let pending_count = match last_sync_at {
            Some(mark) => source_reports
                .iter()
                .filter(|report| report.created_at > mark)
                .count(),
            None => source_reports.len(),
        };

        Ok(SyncStats {
            total_source_records: source_reports.len(),
            total_target_records: target_reports.len(),
            last_sync_at,
            pending_count,
        })
    }
}

//! Orchestrates one source-to-target reconciliation pass.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::sync::mapper::to_report_draft;
use crate::sync::matcher::find_existing;
use crate::sync::model::SyncResult;
use crate::sync::stores::{
    Clock, SourceReportStore, SystemClock, TargetReportStore, WatermarkStore,
};

/// Drives a full source-to-target pass: fetch, map, match, write, watermark.
///
/// Runs are strictly sequential and not re-entrant; concurrent runs against
/// the same target store are unsafe (single-trigger assumption, no locking).
/// Cancellation is not supported: a started run either completes, possibly
/// with per-record errors, or fails outright on the initial fetch.
pub struct ReportSyncEngine {
    source: Arc<dyn SourceReportStore>,
    target: Arc<dyn TargetReportStore>,
    watermarks: Arc<dyn WatermarkStore>,
    clock: Arc<dyn Clock>,
}

impl ReportSyncEngine {
    pub fn new(
        source: Arc<dyn SourceReportStore>,
        target: Arc<dyn TargetReportStore>,
        watermarks: Arc<dyn WatermarkStore>,
    ) -> Self {
        Self::with_clock(source, target, watermarks, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn SourceReportStore>,
        target: Arc<dyn TargetReportStore>,
        watermarks: Arc<dyn WatermarkStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            target,
            watermarks,
            clock,
        }
    }

    /// Run one full pass over the source store.
    ///
    /// A source or snapshot fetch failure aborts the run with a single error
    /// and leaves the watermark untouched. Per-record write failures are
    /// collected and the loop continues; the watermark then still moves,
    /// since the pass itself completed. The engine does not filter by
    /// watermark; pending counts are a stats concern.
    pub async fn run_full_sync(&self) -> SyncResult {
        debug!("starting report sync pass");

        let source_reports = match self.source.fetch_all().await {
            Ok(reports) => reports,
            Err(err) => {
                error!("source fetch failed, aborting pass: {}", err);
                return SyncResult::failed(format!("Sync failed: {}", err));
            }
        };

        // One frozen snapshot per pass. A snapshot failure is as fatal as
        // the source fetch: matching needs the complete target set.
        let snapshot = match self.target.fetch_all().await {
            Ok(reports) => reports,
            Err(err) => {
                error!("target snapshot fetch failed, aborting pass: {}", err);
                return SyncResult::failed(format!("Sync failed: {}", err));
            }
        };

        let mut imported = 0;
        let mut updated = 0;
        let mut errors = Vec::new();

        for report in &source_reports {
            let draft = to_report_draft(report);

            match find_existing(report, &snapshot) {
                Some(existing) => match self.target.update(&existing.id, draft).await {
                    Ok(()) => {
                        debug!("report {} matched {}, updated", report.id, existing.id);
                        updated += 1;
                    }
                    Err(err) => {
                        errors.push(format!("Failed to sync report {}: {}", report.id, err));
                    }
                },
                None => match self.target.create(draft).await {
                    Ok(new_id) => {
                        debug!("report {} imported as {}", report.id, new_id);
                        imported += 1;
                    }
                    Err(err) => {
                        errors.push(format!("Failed to sync report {}: {}", report.id, err));
                    }
                },
            }
        }

        if let Err(err) = self.watermarks.save(self.clock.now()) {
            warn!("failed to persist sync watermark: {}", err);
        }

        SyncResult::completed(imported, updated, errors)
    }

    /// Clear the watermark, then run a full pass. Forces pending counts to
    /// be recomputed from scratch.
    pub async fn force_full_sync(&self) -> SyncResult {
        if let Err(err) = self.watermarks.clear() {
            error!("failed to clear sync watermark: {}", err);
            return SyncResult::failed(format!("Sync failed: {}", err));
        }
        self.run_full_sync().await
    }
}

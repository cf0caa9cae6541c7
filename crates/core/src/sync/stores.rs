//! Store and clock ports consumed by the sync engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::reports::{DamageReport, Report, ReportDraft};

/// Read side of the citizen-report store (mobile lineage).
#[async_trait]
pub trait SourceReportStore: Send + Sync {
    /// Every stored report, newest-first by creation time.
    ///
    /// A failure here is fatal for the current pass; callers must not retry
    /// automatically.
    async fn fetch_all(&self) -> Result<Vec<DamageReport>>;
}

/// Admin-side report store (target lineage).
///
/// Each call is independently atomic; no transaction spans multiple calls.
#[async_trait]
pub trait TargetReportStore: Send + Sync {
    /// Every stored report, newest-first by creation time.
    async fn fetch_all(&self) -> Result<Vec<Report>>;

    /// Insert a new report, stamping both timestamps at write time. Returns
    /// the new id.
    async fn create(&self, draft: ReportDraft) -> Result<String>;

    /// Merge the draft's fields into an existing report and refresh its
    /// update timestamp.
    async fn update(&self, id: &str, draft: ReportDraft) -> Result<()>;
}

/// Persistence port for the last-sync watermark.
///
/// Single writer (the engine), multiple readers (the stats service and the
/// engine's own next run).
pub trait WatermarkStore: Send + Sync {
    fn load(&self) -> Result<Option<DateTime<Utc>>>;
    fn save(&self, at: DateTime<Utc>) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Wall-clock source, injected so tests can pin watermark timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

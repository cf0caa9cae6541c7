//! Engine and stats tests over in-memory fake stores.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::errors::{Error, Result};
use crate::reports::{DamageReport, DamageStatus, Report, ReportDraft, ReportPriority, ReportStatus, Severity};
use crate::sync::{
    Clock, ReportSyncEngine, SourceReportStore, SyncStatsService, TargetReportStore, WatermarkStore,
};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

struct FakeSource {
    reports: Vec<DamageReport>,
    fail: bool,
}

impl FakeSource {
    fn with_reports(reports: Vec<DamageReport>) -> Self {
        Self {
            reports,
            fail: false,
        }
    }

    fn unavailable() -> Self {
        Self {
            reports: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SourceReportStore for FakeSource {
    async fn fetch_all(&self) -> Result<Vec<DamageReport>> {
        if self.fail {
            return Err(Error::store_unavailable("mobile store offline"));
        }
        Ok(self.reports.clone())
    }
}

struct FakeTarget {
    rows: Mutex<Vec<Report>>,
    next_id: Mutex<u32>,
    clock: Arc<FixedClock>,
    fail_on_latitude: Option<f64>,
}

impl FakeTarget {
    fn new(clock: Arc<FixedClock>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
            clock,
            fail_on_latitude: None,
        }
    }

    fn failing_on_latitude(clock: Arc<FixedClock>, latitude: f64) -> Self {
        Self {
            fail_on_latitude: Some(latitude),
            ..Self::new(clock)
        }
    }

    fn rows(&self) -> Vec<Report> {
        self.rows.lock().expect("rows lock").clone()
    }
}

#[async_trait]
impl TargetReportStore for FakeTarget {
    async fn fetch_all(&self) -> Result<Vec<Report>> {
        Ok(self.rows())
    }

    async fn create(&self, draft: ReportDraft) -> Result<String> {
        if Some(draft.latitude) == self.fail_on_latitude {
            return Err(Error::write_rejected("constraint violation"));
        }
        let mut next_id = self.next_id.lock().expect("id lock");
        *next_id += 1;
        let id = format!("t{}", next_id);
        let now = self.clock.now();
        self.rows.lock().expect("rows lock").push(Report {
            id: id.clone(),
            user_id: None,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            latitude: draft.latitude,
            longitude: draft.longitude,
            location_name: draft.location_name,
            surface_m2: None,
            budget: None,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update(&self, id: &str, draft: ReportDraft) -> Result<()> {
        if Some(draft.latitude) == self.fail_on_latitude {
            return Err(Error::write_rejected("constraint violation"));
        }
        let mut rows = self.rows.lock().expect("rows lock");
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| Error::not_found(id.to_string()))?;
        row.title = draft.title;
        row.description = draft.description;
        row.status = draft.status;
        row.priority = draft.priority;
        row.latitude = draft.latitude;
        row.longitude = draft.longitude;
        row.location_name = draft.location_name;
        row.updated_at = self.clock.now();
        Ok(())
    }
}

#[derive(Default)]
struct MemoryWatermarks {
    value: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryWatermarks {
    fn preset(at: DateTime<Utc>) -> Self {
        Self {
            value: Mutex::new(Some(at)),
        }
    }

    fn current(&self) -> Option<DateTime<Utc>> {
        *self.value.lock().expect("watermark lock")
    }
}

impl WatermarkStore for MemoryWatermarks {
    fn load(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.current())
    }

    fn save(&self, at: DateTime<Utc>) -> Result<()> {
        *self.value.lock().expect("watermark lock") = Some(at);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.value.lock().expect("watermark lock") = None;
        Ok(())
    }
}

fn source_report(id: &str, latitude: f64, longitude: f64, created_at: &str) -> DamageReport {
    DamageReport {
        id: id.to_string(),
        user_id: None,
        latitude,
        longitude,
        severity: Severity::Critique,
        status: DamageStatus::Nouveau,
        description: None,
        length_km: None,
        surface_m2: None,
        budget: None,
        contractor: None,
        image_url: None,
        images: Vec::new(),
        created_at: created_at.parse().expect("timestamp"),
        updated_at: created_at.parse().expect("timestamp"),
    }
}

fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single().expect("timestamp")
}

#[tokio::test]
async fn single_critique_report_imports_into_empty_target() {
    let clock = Arc::new(FixedClock(noon(2024, 1, 5)));
    let source = Arc::new(FakeSource::with_reports(vec![source_report(
        "r1",
        -18.8792,
        47.5079,
        "2024-01-05T10:00:00Z",
    )]));
    let target = Arc::new(FakeTarget::new(clock.clone()));
    let watermarks = Arc::new(MemoryWatermarks::default());
    let engine = ReportSyncEngine::with_clock(
        source,
        target.clone(),
        watermarks.clone(),
        clock.clone(),
    );

    let result = engine.run_full_sync().await;

    assert!(result.success);
    assert_eq!(result.imported, 1);
    assert_eq!(result.updated, 0);
    assert!(result.errors.is_empty());
    assert_eq!(result.message, "Sync complete: 1 imported, 0 updated, 0 errors");

    let rows = target.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].priority, ReportPriority::Urgent);
    assert_eq!(rows[0].status, ReportStatus::Reported);
    assert_eq!(rows[0].title, "Damaged road - critique");
    assert_eq!(rows[0].latitude, -18.8792);

    assert_eq!(watermarks.current(), Some(clock.now()));
}

#[tokio::test]
async fn second_pass_updates_instead_of_importing() {
    let clock = Arc::new(FixedClock(noon(2024, 1, 5)));
    let source = Arc::new(FakeSource::with_reports(vec![
        source_report("r1", -18.8792, 47.5079, "2024-01-05T10:00:00Z"),
        source_report("r2", -18.9100, 47.5200, "2024-01-05T11:00:00Z"),
    ]));
    let target = Arc::new(FakeTarget::new(clock.clone()));
    let watermarks = Arc::new(MemoryWatermarks::default());
    let engine =
        ReportSyncEngine::with_clock(source, target.clone(), watermarks, clock.clone());

    let first = engine.run_full_sync().await;
    assert_eq!(first.imported, 2);

    let second = engine.run_full_sync().await;
    assert_eq!(second.imported, 0);
    assert_eq!(second.updated, 2);
    assert!(second.success);
    assert_eq!(target.rows().len(), 2);
}

#[tokio::test]
async fn per_record_failure_does_not_abort_the_pass() {
    let clock = Arc::new(FixedClock(noon(2024, 1, 5)));
    let reports: Vec<DamageReport> = (1..=5)
        .map(|i| {
            source_report(
                &format!("r{}", i),
                -18.8 - (i as f64) * 0.01,
                47.5,
                "2024-01-05T10:00:00Z",
            )
        })
        .collect();
    let bad_latitude = reports[2].latitude;
    let source = Arc::new(FakeSource::with_reports(reports));
    let target = Arc::new(FakeTarget::failing_on_latitude(clock.clone(), bad_latitude));
    let watermarks = Arc::new(MemoryWatermarks::default());
    let engine =
        ReportSyncEngine::with_clock(source, target.clone(), watermarks, clock.clone());

    let result = engine.run_full_sync().await;

    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("r3"), "error was: {}", result.errors[0]);
    assert_eq!(result.imported + result.updated, 4);
    assert_eq!(target.rows().len(), 4);
}

#[tokio::test]
async fn source_fetch_failure_aborts_and_keeps_watermark() {
    let clock = Arc::new(FixedClock(noon(2024, 1, 10)));
    let previous_mark = noon(2024, 1, 8);
    let source = Arc::new(FakeSource::unavailable());
    let target = Arc::new(FakeTarget::new(clock.clone()));
    let watermarks = Arc::new(MemoryWatermarks::preset(previous_mark));
    let engine = ReportSyncEngine::with_clock(
        source,
        target,
        watermarks.clone(),
        clock,
    );

    let result = engine.run_full_sync().await;

    assert!(!result.success);
    assert_eq!(result.imported, 0);
    assert_eq!(result.updated, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.message.starts_with("Sync failed:"));
    assert_eq!(watermarks.current(), Some(previous_mark));
}

#[tokio::test]
async fn force_full_sync_rewrites_the_watermark() {
    let clock = Arc::new(FixedClock(noon(2024, 2, 1)));
    let stale_mark = noon(2024, 1, 1);
    let source = Arc::new(FakeSource::with_reports(Vec::new()));
    let target = Arc::new(FakeTarget::new(clock.clone()));
    let watermarks = Arc::new(MemoryWatermarks::preset(stale_mark));
    let engine = ReportSyncEngine::with_clock(
        source,
        target,
        watermarks.clone(),
        clock.clone(),
    );

    let result = engine.force_full_sync().await;

    assert!(result.success);
    assert_eq!(watermarks.current(), Some(clock.now()));
}

#[tokio::test]
async fn stats_pending_counts_follow_the_watermark() {
    let clock = Arc::new(FixedClock(noon(2024, 1, 6)));
    let source = Arc::new(FakeSource::with_reports(vec![
        source_report("old", -18.88, 47.50, "2024-01-04T10:00:00Z"),
        source_report("new", -18.89, 47.51, "2024-01-05T18:00:00Z"),
    ]));
    let target = Arc::new(FakeTarget::new(clock.clone()));

    let no_mark = Arc::new(MemoryWatermarks::default());
    let stats = SyncStatsService::new(source.clone(), target.clone(), no_mark)
        .get_stats()
        .await
        .expect("stats");
    assert_eq!(stats.total_source_records, 2);
    assert_eq!(stats.total_target_records, 0);
    assert_eq!(stats.last_sync_at, None);
    assert_eq!(stats.pending_count, 2);

    let marked = Arc::new(MemoryWatermarks::preset(noon(2024, 1, 5)));
    let stats = SyncStatsService::new(source, target, marked)
        .get_stats()
        .await
        .expect("stats");
    assert_eq!(stats.pending_count, 1);
}

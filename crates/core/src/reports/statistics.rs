//! Read-only aggregates over source reports, for dashboards.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{DamageReport, DamageStatus, Severity};

const ALL_STATUSES: [DamageStatus; 4] = [
    DamageStatus::Nouveau,
    DamageStatus::Verifie,
    DamageStatus::EnCours,
    DamageStatus::Termine,
];

const ALL_SEVERITIES: [Severity; 4] = [
    Severity::Faible,
    Severity::Moyenne,
    Severity::Elevee,
    Severity::Critique,
];

/// Aggregate counts over a set of source reports. Every status and severity
/// key is present, zero-valued when unrepresented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReportStatistics {
    pub total: usize,
    pub by_status: HashMap<DamageStatus, usize>,
    pub by_severity: HashMap<Severity, usize>,
}

/// Count reports per status and severity.
pub fn summarize(reports: &[DamageReport]) -> SourceReportStatistics {
    let mut by_status: HashMap<DamageStatus, usize> =
        ALL_STATUSES.iter().map(|status| (*status, 0)).collect();
    let mut by_severity: HashMap<Severity, usize> =
        ALL_SEVERITIES.iter().map(|severity| (*severity, 0)).collect();

    for report in reports {
        *by_status.entry(report.status).or_insert(0) += 1;
        *by_severity.entry(report.severity).or_insert(0) += 1;
    }

    SourceReportStatistics {
        total: reports.len(),
        by_status,
        by_severity,
    }
}

/// Whether the report was created within the last `hours` hours.
pub fn is_recent(report: &DamageReport, now: DateTime<Utc>, hours: i64) -> bool {
    now.signed_duration_since(report.created_at) <= Duration::hours(hours)
}

/// Keep only reports created strictly after `since`. `None` selects every
/// report (first-sync semantics).
pub fn reports_to_sync(
    reports: Vec<DamageReport>,
    since: Option<DateTime<Utc>>,
) -> Vec<DamageReport> {
    match since {
        Some(mark) => reports
            .into_iter()
            .filter(|report| report.created_at > mark)
            .collect(),
        None => reports,
    }
}

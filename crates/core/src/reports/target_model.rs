//! Target-lineage models: admin-tracked work items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Work-item status in the admin lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Reported,
    InProgress,
    Completed,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Reported => "reported",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Completed => "completed",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage priority in the admin lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl ReportPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPriority::Low => "low",
            ReportPriority::Medium => "medium",
            ReportPriority::High => "high",
            ReportPriority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for ReportPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One admin-tracked work item. Same real-world entity as a
/// [`DamageReport`](crate::reports::DamageReport), different vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    #[serde(default)]
    pub surface_m2: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The mapped shape written to the target store. Identity and timestamps are
/// assigned by the target adapter at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
}

//! Translation from the source vocabulary to the target vocabulary.

use crate::reports::{
    DamageReport, DamageStatus, ReportDraft, ReportPriority, ReportStatus, Severity,
};

/// Map a source report to the target-store shape.
///
/// Total and deterministic. Every severity and status variant has an
/// explicit arm, so a new source variant fails to compile instead of
/// silently defaulting; unrecognized wire tokens are already normalized at
/// the deserialization boundary. Coordinates are copied verbatim.
pub fn to_report_draft(report: &DamageReport) -> ReportDraft {
    let priority = match report.severity {
        Severity::Critique => ReportPriority::Urgent,
        Severity::Elevee => ReportPriority::High,
        Severity::Moyenne => ReportPriority::Medium,
        Severity::Faible => ReportPriority::Low,
    };

    let status = match report.status {
        DamageStatus::Nouveau => ReportStatus::Reported,
        DamageStatus::Verifie => ReportStatus::InProgress,
        DamageStatus::EnCours => ReportStatus::InProgress,
        DamageStatus::Termine => ReportStatus::Completed,
    };

    let description = report
        .description
        .clone()
        .unwrap_or_else(|| format!("Road of {}km damaged", report.length_km.unwrap_or(0.0)));

    ReportDraft {
        title: format!("Damaged road - {}", report.severity.as_wire_str()),
        description,
        status,
        priority,
        latitude: report.latitude,
        longitude: report.longitude,
        location_name: format!("Position: {}, {}", report.latitude, report.longitude),
    }
}

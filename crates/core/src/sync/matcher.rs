//! Duplicate detection against a frozen target snapshot.

use crate::reports::{DamageReport, Report};

/// Coordinate tolerance for the location match, in decimal degrees (~11m).
pub const MATCH_COORD_EPSILON_DEG: f64 = 0.0001;

/// Find the target report an incoming source report corresponds to, if any.
///
/// The snapshot is fetched once per pass and passed in whole, so a record
/// can never match its own just-created twin within the same pass. Match
/// condition: both coordinate deltas strictly below
/// [`MATCH_COORD_EPSILON_DEG`], and equal UTC calendar dates of creation.
/// First hit in snapshot order wins; two same-day reports at the same point
/// collapse onto the same target record (known ambiguity, kept as-is).
pub fn find_existing<'a>(source: &DamageReport, snapshot: &'a [Report]) -> Option<&'a Report> {
    snapshot.iter().find(|report| {
        let location_match = (report.latitude - source.latitude).abs() < MATCH_COORD_EPSILON_DEG
            && (report.longitude - source.longitude).abs() < MATCH_COORD_EPSILON_DEG;
        let date_match = report.created_at.date_naive() == source.created_at.date_naive();
        location_match && date_match
    })
}

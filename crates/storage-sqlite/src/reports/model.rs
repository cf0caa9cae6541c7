//! Database models for admin-tracked reports.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use viasync_core::errors::{Error, Result};
use viasync_core::reports::{Report, ReportDraft, ReportPriority, ReportStatus};

pub(crate) fn enum_to_db<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}

pub(crate) fn enum_from_db<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_str(&format!("\"{}\"", value))?)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| Error::Unexpected(format!("invalid timestamp '{}': {}", value, err)))
}

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = crate::schema::reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReportDB {
    pub id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub surface_m2: Option<f64>,
    pub budget: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl ReportDB {
    pub fn from_draft(draft: &ReportDraft, id: String, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id,
            user_id: None,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: enum_to_db(&draft.status)?,
            priority: enum_to_db(&draft.priority)?,
            latitude: draft.latitude,
            longitude: draft.longitude,
            location_name: draft.location_name.clone(),
            surface_m2: None,
            budget: None,
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        })
    }

    pub fn try_into_domain(self) -> Result<Report> {
        let status: ReportStatus = enum_from_db(&self.status)?;
        let priority: ReportPriority = enum_from_db(&self.priority)?;
        let created_at = parse_timestamp(&self.created_at)?;
        let updated_at = parse_timestamp(&self.updated_at)?;

        Ok(Report {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            status,
            priority,
            latitude: self.latitude,
            longitude: self.longitude,
            location_name: self.location_name,
            surface_m2: self.surface_m2,
            budget: self.budget,
            created_at,
            updated_at,
        })
    }
}

/// Column set written when merging a mapped draft into an existing row.
/// Leaves identity, ownership, measurements, and `created_at` untouched.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::reports)]
pub struct ReportUpdateDB {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub updated_at: String,
}

impl ReportUpdateDB {
    pub fn from_draft(draft: &ReportDraft, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: enum_to_db(&draft.status)?,
            priority: enum_to_db(&draft.priority)?,
            latitude: draft.latitude,
            longitude: draft.longitude,
            location_name: draft.location_name.clone(),
            updated_at: now.to_rfc3339(),
        })
    }
}

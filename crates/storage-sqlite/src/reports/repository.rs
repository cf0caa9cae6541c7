//! Repository for admin-tracked reports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use uuid::Uuid;

use viasync_core::errors::{Error, Result};
use viasync_core::reports::{Report, ReportDraft, ReportStatus};
use viasync_core::sync::TargetReportStore;

use super::model::{enum_to_db, ReportDB, ReportUpdateDB};
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::reports;

pub struct ReportRepository {
    pool: Arc<DbPool>,
}

impl ReportRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ReportRepository { pool }
    }

    pub fn get_all_impl(&self) -> Result<Vec<Report>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = reports::table
            .order(reports::created_at.desc())
            .load::<ReportDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(ReportDB::try_into_domain).collect()
    }

    pub fn get_by_id_impl(&self, report_id: &str) -> Result<Option<Report>> {
        let mut conn = get_connection(&self.pool)?;
        let row = reports::table
            .find(report_id)
            .first::<ReportDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(ReportDB::try_into_domain).transpose()
    }

    pub fn get_by_status_impl(&self, status: ReportStatus) -> Result<Vec<Report>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = reports::table
            .filter(reports::status.eq(enum_to_db(&status)?))
            .order(reports::created_at.desc())
            .load::<ReportDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(ReportDB::try_into_domain).collect()
    }

    pub fn create_impl(&self, draft: &ReportDraft) -> Result<String> {
        let mut conn = get_connection(&self.pool)?;
        let row = ReportDB::from_draft(draft, Uuid::new_v4().to_string(), Utc::now())?;
        diesel::insert_into(reports::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        debug!("created report {}", row.id);
        Ok(row.id)
    }

    pub fn update_impl(&self, report_id: &str, draft: &ReportDraft) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let changes = ReportUpdateDB::from_draft(draft, Utc::now())?;
        let affected = diesel::update(reports::table.find(report_id))
            .set(&changes)
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        if affected == 0 {
            return Err(Error::not_found(format!(
                "report {} does not exist",
                report_id
            )));
        }
        debug!("updated report {}", report_id);
        Ok(())
    }

    pub fn delete_impl(&self, report_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::delete(reports::table.find(report_id))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        if affected == 0 {
            return Err(Error::not_found(format!(
                "report {} does not exist",
                report_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TargetReportStore for ReportRepository {
    async fn fetch_all(&self) -> Result<Vec<Report>> {
        self.get_all_impl()
    }

    async fn create(&self, draft: ReportDraft) -> Result<String> {
        self.create_impl(&draft)
    }

    async fn update(&self, id: &str, draft: ReportDraft) -> Result<()> {
        self.update_impl(id, &draft)
    }
}

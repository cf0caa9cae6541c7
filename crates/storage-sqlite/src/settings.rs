//! Key-value settings persistence, including the sync watermark.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use viasync_core::errors::{Error, Result};
use viasync_core::sync::{WatermarkStore, LAST_SYNC_SETTING_KEY};

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::app_settings;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(primary_key(setting_key))]
#[diesel(table_name = crate::schema::app_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AppSettingDB {
    pub setting_key: String,
    pub setting_value: String,
}

pub struct SettingsRepository {
    pool: Arc<DbPool>,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SettingsRepository { pool }
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let row = app_settings::table
            .find(key)
            .first::<AppSettingDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(|setting| setting.setting_value))
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let row = AppSettingDB {
            setting_key: key.to_string(),
            setting_value: value.to_string(),
        };
        diesel::insert_into(app_settings::table)
            .values(&row)
            .on_conflict(app_settings::setting_key)
            .do_update()
            .set(app_settings::setting_value.eq(&row.setting_value))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(())
    }

    pub fn delete_setting(&self, key: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::delete(app_settings::table.find(key))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(())
    }
}

impl WatermarkStore for SettingsRepository {
    fn load(&self) -> Result<Option<DateTime<Utc>>> {
        let raw = self.get_setting(LAST_SYNC_SETTING_KEY)?;
        raw.map(|value| {
            DateTime::parse_from_rfc3339(&value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|err| Error::Unexpected(format!("invalid watermark '{}': {}", value, err)))
        })
        .transpose()
    }

    fn save(&self, at: DateTime<Utc>) -> Result<()> {
        self.set_setting(LAST_SYNC_SETTING_KEY, &at.to_rfc3339())
    }

    fn clear(&self) -> Result<()> {
        self.delete_setting(LAST_SYNC_SETTING_KEY)
    }
}

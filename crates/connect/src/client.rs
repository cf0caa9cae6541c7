//! HTTP client for the Firestore REST API backing the mobile lineage.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use viasync_core::errors::{Error as CoreError, Result as CoreResult};
use viasync_core::reports::{DamageReport, DamageStatus, NewDamageReport};
use viasync_core::sync::SourceReportStore;

use crate::error::{ConnectError, Result};
use crate::firestore::{
    decode_damage_report, encode_new_damage_report, FirestoreDocument, FirestoreValue,
};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Default collection holding citizen damage reports.
pub const DEFAULT_REPORTS_COLLECTION: &str = "routes_endommagees";

/// One result row of a `documents:runQuery` response. Rows without a
/// document (read-time only) are skipped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRow {
    document: Option<FirestoreDocument>,
}

/// Client for the Firestore REST API of the mobile report store.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    collection: String,
    api_key: Option<String>,
}

impl FirestoreClient {
    pub fn new(project_id: &str) -> Self {
        Self::with_base_url(FIRESTORE_BASE_URL, project_id)
    }

    /// Create a client against a non-default endpoint (emulator, tests).
    pub fn with_base_url(base_url: &str, project_id: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            collection: DEFAULT_REPORTS_COLLECTION.to_string(),
            api_key: None,
        }
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = collection.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    fn key_query(&self) -> Vec<(&'static str, String)> {
        self.api_key
            .iter()
            .map(|key| ("key", key.clone()))
            .collect()
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!("API response error ({}): {}", status, body);
        Err(ConnectError::api(status.as_u16(), body))
    }

    /// Every report in the collection, newest-first by `dateCreation`.
    pub async fn fetch_all_reports(&self) -> Result<Vec<DamageReport>> {
        let url = format!("{}:runQuery", self.documents_url());
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "orderBy": [{
                    "field": { "fieldPath": "dateCreation" },
                    "direction": "DESCENDING"
                }]
            }
        });

        let response = self
            .client
            .post(&url)
            .query(&self.key_query())
            .json(&body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        let rows: Vec<RunQueryRow> = response.json().await?;

        let mut reports = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(document) = row.document else { continue };
            reports.push(decode_damage_report(&document)?);
        }
        debug!("fetched {} reports from {}", reports.len(), self.collection);
        Ok(reports)
    }

    /// Create a new citizen report. Status is stamped `nouveau` and both
    /// timestamps are set at write time. Returns the new document id.
    pub async fn create_report(&self, report: &NewDamageReport) -> Result<String> {
        let url = format!("{}/{}", self.documents_url(), self.collection);
        let fields = encode_new_damage_report(report, Utc::now());
        let body = json!({ "fields": fields });

        let response = self
            .client
            .post(&url)
            .query(&self.key_query())
            .json(&body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        let document: FirestoreDocument = response.json().await?;
        debug!("created report {}", document.document_id());
        Ok(document.document_id().to_string())
    }

    /// Update the lifecycle status of an existing report, refreshing its
    /// update timestamp.
    pub async fn update_report_status(
        &self,
        report_id: &str,
        status: DamageStatus,
    ) -> Result<()> {
        let url = format!("{}/{}/{}", self.documents_url(), self.collection, report_id);

        let mut fields = HashMap::new();
        fields.insert(
            "statut".to_string(),
            FirestoreValue::string(status.as_wire_str()),
        );
        fields.insert(
            "dateMiseAJour".to_string(),
            FirestoreValue::timestamp(Utc::now()),
        );
        let body = json!({ "fields": fields });

        let mut query = self.key_query();
        query.push(("updateMask.fieldPaths", "statut".to_string()));
        query.push(("updateMask.fieldPaths", "dateMiseAJour".to_string()));

        let response = self
            .client
            .patch(&url)
            .query(&query)
            .json(&body)
            .send()
            .await?;
        Self::check_response(response).await?;
        debug!("updated report {} status to {}", report_id, status);
        Ok(())
    }

    /// Probe the store with a single-document list.
    pub async fn test_connection(&self) -> bool {
        let url = format!("{}/{}", self.documents_url(), self.collection);
        let mut query = self.key_query();
        query.push(("pageSize", "1".to_string()));

        match self.client.get(&url).query(&query).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!("connection probe failed: {}", err);
                false
            }
        }
    }
}

#[async_trait]
impl SourceReportStore for FirestoreClient {
    /// Fetch failures surface as `StoreUnavailable`: fatal for the current
    /// sync pass, never retried here.
    async fn fetch_all(&self) -> CoreResult<Vec<DamageReport>> {
        self.fetch_all_reports()
            .await
            .map_err(|err| CoreError::StoreUnavailable(err.to_string()))
    }
}

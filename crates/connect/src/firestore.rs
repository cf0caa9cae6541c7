//! Typed model for Firestore REST documents and values.
//!
//! Firestore encodes each field value as a single-key object naming the
//! type (`{"doubleValue": 47.5}`); integers come back as decimal strings.
//! Only the value kinds the report collection actually uses are modeled.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use viasync_core::reports::{DamageReport, DamageStatus, NewDamageReport, Severity};

use crate::error::{ConnectError, Result};

/// One field value in a Firestore REST document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirestoreValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_value: Option<ArrayValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_value: Option<MapValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
}

impl FirestoreValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Self::default()
        }
    }

    pub fn timestamp(value: DateTime<Utc>) -> Self {
        Self {
            timestamp_value: Some(value),
            ..Self::default()
        }
    }

    pub fn array_of_strings(values: &[String]) -> Self {
        Self {
            array_value: Some(ArrayValue {
                values: values.iter().map(FirestoreValue::string).collect(),
            }),
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    /// Numeric value, accepting either `doubleValue` or the string-encoded
    /// `integerValue`.
    pub fn as_f64(&self) -> Option<f64> {
        self.double_value
            .or_else(|| self.integer_value.as_deref().and_then(|v| v.parse().ok()))
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_value
    }

    pub fn as_string_list(&self) -> Vec<String> {
        self.array_value
            .as_ref()
            .map(|array| {
                array
                    .values
                    .iter()
                    .filter_map(|value| value.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A document resource as returned by the Firestore REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    /// Full resource name (`projects/{p}/databases/(default)/documents/...`).
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl FirestoreDocument {
    /// Trailing path segment of the resource name.
    pub fn document_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

fn field_str(doc: &FirestoreDocument, name: &str) -> Option<String> {
    doc.fields
        .get(name)
        .and_then(FirestoreValue::as_str)
        .map(str::to_string)
}

fn field_f64(doc: &FirestoreDocument, name: &str) -> Result<f64> {
    doc.fields
        .get(name)
        .and_then(FirestoreValue::as_f64)
        .ok_or_else(|| {
            ConnectError::decode(format!(
                "document {} has no numeric field '{}'",
                doc.document_id(),
                name
            ))
        })
}

fn opt_f64(doc: &FirestoreDocument, name: &str) -> Option<f64> {
    doc.fields.get(name).and_then(FirestoreValue::as_f64)
}

/// Decode a report-collection document into the source domain model.
///
/// `gravite` and `statut` use their lenient defaults for unrecognized or
/// missing tokens; a missing `dateCreation` falls back to the document's own
/// create time.
pub fn decode_damage_report(doc: &FirestoreDocument) -> Result<DamageReport> {
    let latitude = field_f64(doc, "latitude")?;
    let longitude = field_f64(doc, "longitude")?;

    let severity = doc
        .fields
        .get("gravite")
        .and_then(FirestoreValue::as_str)
        .map(Severity::from_wire_lenient)
        .unwrap_or(Severity::Moyenne);
    let status = doc
        .fields
        .get("statut")
        .and_then(FirestoreValue::as_str)
        .map(DamageStatus::from_wire_lenient)
        .unwrap_or(DamageStatus::Nouveau);

    let created_at = doc
        .fields
        .get("dateCreation")
        .and_then(FirestoreValue::as_timestamp)
        .or(doc.create_time)
        .ok_or_else(|| {
            ConnectError::decode(format!(
                "document {} has no creation timestamp",
                doc.document_id()
            ))
        })?;
    let updated_at = doc
        .fields
        .get("dateMiseAJour")
        .and_then(FirestoreValue::as_timestamp)
        .or(doc.update_time)
        .unwrap_or(created_at);

    Ok(DamageReport {
        id: doc.document_id().to_string(),
        user_id: field_str(doc, "utilisateur_id"),
        latitude,
        longitude,
        severity,
        status,
        description: field_str(doc, "description"),
        length_km: opt_f64(doc, "longueurKm"),
        surface_m2: opt_f64(doc, "surfaceM2"),
        budget: opt_f64(doc, "budget"),
        contractor: field_str(doc, "entreprise"),
        image_url: field_str(doc, "imageUrl"),
        images: doc
            .fields
            .get("images")
            .map(FirestoreValue::as_string_list)
            .unwrap_or_default(),
        created_at,
        updated_at,
    })
}

/// Encode a creation payload into Firestore fields. `statut` is forced to
/// `nouveau` and both timestamps are stamped with `now`.
pub fn encode_new_damage_report(
    report: &NewDamageReport,
    now: DateTime<Utc>,
) -> HashMap<String, FirestoreValue> {
    let mut fields = HashMap::new();
    fields.insert("latitude".to_string(), FirestoreValue::double(report.latitude));
    fields.insert(
        "longitude".to_string(),
        FirestoreValue::double(report.longitude),
    );
    fields.insert(
        "gravite".to_string(),
        FirestoreValue::string(report.severity.as_wire_str()),
    );
    fields.insert(
        "statut".to_string(),
        FirestoreValue::string(DamageStatus::Nouveau.as_wire_str()),
    );
    fields.insert("dateCreation".to_string(), FirestoreValue::timestamp(now));
    fields.insert("dateMiseAJour".to_string(), FirestoreValue::timestamp(now));

    if let Some(user_id) = &report.user_id {
        fields.insert(
            "utilisateur_id".to_string(),
            FirestoreValue::string(user_id),
        );
    }
    if let Some(description) = &report.description {
        fields.insert(
            "description".to_string(),
            FirestoreValue::string(description),
        );
    }
    if let Some(length_km) = report.length_km {
        fields.insert("longueurKm".to_string(), FirestoreValue::double(length_km));
    }
    if let Some(surface_m2) = report.surface_m2 {
        fields.insert("surfaceM2".to_string(), FirestoreValue::double(surface_m2));
    }
    if let Some(budget) = report.budget {
        fields.insert("budget".to_string(), FirestoreValue::double(budget));
    }
    if let Some(contractor) = &report.contractor {
        fields.insert("entreprise".to_string(), FirestoreValue::string(contractor));
    }
    if let Some(image_url) = &report.image_url {
        fields.insert("imageUrl".to_string(), FirestoreValue::string(image_url));
    }
    if !report.images.is_empty() {
        fields.insert(
            "images".to_string(),
            FirestoreValue::array_of_strings(&report.images),
        );
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> FirestoreDocument {
        serde_json::from_value(serde_json::json!({
            "name": "projects/road-app/databases/(default)/documents/routes_endommagees/abc123",
            "fields": {
                "latitude": { "doubleValue": -18.8792 },
                "longitude": { "doubleValue": 47.5079 },
                "gravite": { "stringValue": "critique" },
                "statut": { "stringValue": "nouveau" },
                "description": { "stringValue": "Nid de poule profond" },
                "longueurKm": { "doubleValue": 1.2 },
                "budget": { "integerValue": "2500" },
                "entreprise": { "stringValue": "Colas" },
                "imageUrl": { "stringValue": "https://example.com/main.jpg" },
                "images": { "arrayValue": { "values": [
                    { "stringValue": "https://example.com/a.jpg" },
                    { "stringValue": "https://example.com/b.jpg" }
                ] } },
                "dateCreation": { "timestampValue": "2024-01-05T10:00:00Z" },
                "dateMiseAJour": { "timestampValue": "2024-01-06T08:30:00Z" }
            },
            "createTime": "2024-01-05T10:00:01Z",
            "updateTime": "2024-01-06T08:30:01Z"
        }))
        .expect("decode document")
    }

    #[test]
    fn document_id_is_last_path_segment() {
        assert_eq!(sample_document().document_id(), "abc123");
    }

    #[test]
    fn decodes_full_document() {
        let report = decode_damage_report(&sample_document()).expect("decode report");
        assert_eq!(report.id, "abc123");
        assert_eq!(report.latitude, -18.8792);
        assert_eq!(report.severity, Severity::Critique);
        assert_eq!(report.status, DamageStatus::Nouveau);
        assert_eq!(report.description.as_deref(), Some("Nid de poule profond"));
        assert_eq!(report.length_km, Some(1.2));
        // integerValue carries numbers as decimal strings
        assert_eq!(report.budget, Some(2500.0));
        assert_eq!(report.images.len(), 2);
        assert_eq!(
            report.created_at,
            "2024-01-05T10:00:00Z".parse::<DateTime<Utc>>().expect("ts")
        );
    }

    #[test]
    fn unknown_gravite_falls_back_to_moyenne() {
        let mut doc = sample_document();
        doc.fields
            .insert("gravite".to_string(), FirestoreValue::string("inconnue"));
        let report = decode_damage_report(&doc).expect("decode report");
        assert_eq!(report.severity, Severity::Moyenne);
    }

    #[test]
    fn missing_date_creation_falls_back_to_create_time() {
        let mut doc = sample_document();
        doc.fields.remove("dateCreation");
        let report = decode_damage_report(&doc).expect("decode report");
        assert_eq!(
            report.created_at,
            "2024-01-05T10:00:01Z".parse::<DateTime<Utc>>().expect("ts")
        );
    }

    #[test]
    fn missing_coordinates_is_a_decode_error() {
        let mut doc = sample_document();
        doc.fields.remove("latitude");
        let err = decode_damage_report(&doc).expect_err("must fail");
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn encode_forces_nouveau_status_and_stamps_timestamps() {
        let now = "2024-03-01T12:00:00Z".parse::<DateTime<Utc>>().expect("ts");
        let payload = NewDamageReport {
            user_id: Some("u7".to_string()),
            latitude: -18.9,
            longitude: 47.5,
            severity: Severity::Elevee,
            description: None,
            length_km: Some(0.4),
            surface_m2: None,
            budget: None,
            contractor: None,
            image_url: None,
            images: Vec::new(),
        };

        let fields = encode_new_damage_report(&payload, now);
        assert_eq!(fields["statut"].as_str(), Some("nouveau"));
        assert_eq!(fields["gravite"].as_str(), Some("elevee"));
        assert_eq!(fields["dateCreation"].as_timestamp(), Some(now));
        assert_eq!(fields["dateMiseAJour"].as_timestamp(), Some(now));
        assert!(!fields.contains_key("description"));
    }
}

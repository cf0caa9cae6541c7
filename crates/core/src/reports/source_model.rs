//! Source-lineage models: citizen damage reports as stored by the mobile app.
//!
//! Wire names follow the mobile lineage's Firestore fields (French
//! vocabulary: `gravite`, `statut`, `longueurKm`). Severity and status
//! decode leniently: an unrecognized wire token falls back to the documented
//! default instead of failing the whole document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Damage severity as reported by citizens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Faible,
    Moyenne,
    Elevee,
    Critique,
}

impl Severity {
    /// Wire token used by the mobile store.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Severity::Faible => "faible",
            Severity::Moyenne => "moyenne",
            Severity::Elevee => "elevee",
            Severity::Critique => "critique",
        }
    }

    /// Parse a wire token, falling back to `Moyenne` for anything
    /// unrecognized.
    pub fn from_wire_lenient(value: &str) -> Self {
        match value {
            "faible" => Severity::Faible,
            "moyenne" => Severity::Moyenne,
            "elevee" => Severity::Elevee,
            "critique" => Severity::Critique,
            _ => Severity::Moyenne,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Lifecycle status of a citizen report in the mobile lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageStatus {
    Nouveau,
    Verifie,
    EnCours,
    Termine,
}

impl DamageStatus {
    /// Wire token used by the mobile store.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            DamageStatus::Nouveau => "nouveau",
            DamageStatus::Verifie => "verifie",
            DamageStatus::EnCours => "en_cours",
            DamageStatus::Termine => "termine",
        }
    }

    /// Parse a wire token, falling back to `Nouveau` for anything
    /// unrecognized.
    pub fn from_wire_lenient(value: &str) -> Self {
        match value {
            "nouveau" => DamageStatus::Nouveau,
            "verifie" => DamageStatus::Verifie,
            "en_cours" => DamageStatus::EnCours,
            "termine" => DamageStatus::Termine,
            _ => DamageStatus::Nouveau,
        }
    }
}

impl std::fmt::Display for DamageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

fn severity_lenient<'de, D>(deserializer: D) -> Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(Severity::from_wire_lenient(&raw))
}

fn status_lenient<'de, D>(deserializer: D) -> Result<DamageStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(DamageStatus::from_wire_lenient(&raw))
}

/// One citizen-submitted damage observation, as stored in the mobile
/// lineage's report collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub id: String,
    #[serde(rename = "utilisateur_id", default)]
    pub user_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "gravite", deserialize_with = "severity_lenient")]
    pub severity: Severity,
    #[serde(rename = "statut", deserialize_with = "status_lenient")]
    pub status: DamageStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "longueurKm", default)]
    pub length_km: Option<f64>,
    #[serde(rename = "surfaceM2", default)]
    pub surface_m2: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(rename = "entreprise", default)]
    pub contractor: Option<String>,
    /// Main photo, if one was attached.
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    /// Additional photos, in upload order.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "dateCreation")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "dateMiseAJour")]
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for the source store. Status is forced to `nouveau` and
/// timestamps are stamped by the adapter at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDamageReport {
    #[serde(rename = "utilisateur_id", default)]
    pub user_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "gravite")]
    pub severity: Severity,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "longueurKm", default)]
    pub length_km: Option<f64>,
    #[serde(rename = "surfaceM2", default)]
    pub surface_m2: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(rename = "entreprise", default)]
    pub contractor: Option<String>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

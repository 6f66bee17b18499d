//! Analysis record types shared across the parsing and persistence pipeline.
//!
//! Two record shapes exist because the two supported model reply formats
//! produce different data: the multi-metric format yields a [`MetricReport`]
//! (a list of per-feature [`HealthMetric`]s plus recommendations), the
//! six-section prose format yields one [`StoolAnalysis`]. They are kept as
//! named variants of [`AnalysisRecord`] rather than merged, so stored history
//! entries keep the exact JSON shape each variant always had.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Clinical severity reading for a single metric.
///
/// Raw model tokens are coerced through [`Severity::coerce`], which is
/// deliberately lossy: anything outside the vocabulary collapses to
/// `moderate`, including tokens like "critical" that arguably carry a
/// stronger reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Maps a raw value token (already trimmed) into the severity vocabulary.
    ///
    /// The token is lower-cased first; unknown tokens become `Moderate`.
    pub fn coerce(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "normal" => Severity::Normal,
            "mild" => Severity::Mild,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            _ => Severity::Moderate,
        }
    }
}

/// Which aspect of the sample a metric describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    Appearance,
    Composition,
    Consistency,
}

impl MetricCategory {
    /// Case-insensitive parse; returns `None` for tokens outside the
    /// category vocabulary so callers can skip the whole line.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "appearance" => Some(MetricCategory::Appearance),
            "composition" => Some(MetricCategory::Composition),
            "consistency" => Some(MetricCategory::Consistency),
            _ => None,
        }
    }
}

/// One scored feature from the multi-metric reply format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthMetric {
    pub name: String,
    pub value: Severity,
    pub severity: Severity,
    pub description: String,
    pub category: MetricCategory,
}

/// Full result of a metric-list analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetricReport {
    pub metrics: Vec<HealthMetric>,
    pub recommendations: Vec<String>,
}

/// Single-record result of a prose-report analysis.
///
/// Fields default to `"Unknown"` / `5` / empty when the corresponding
/// section of the model reply is not recognised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoolAnalysis {
    /// Colour of the stool
    pub color: String,
    /// Consistency of the stool (e.g. soft, hard, loose)
    pub consistency: String,
    /// Shape according to the Bristol Stool Scale
    pub shape: String,
    /// Overall health score from 1-10
    pub health_score: u8,
    /// Potential health concerns identified
    pub concerns: Vec<String>,
    /// Recommendations for improvement
    pub recommendations: Vec<String>,
}

impl Default for StoolAnalysis {
    fn default() -> Self {
        Self {
            color: "Unknown".to_string(),
            consistency: "Unknown".to_string(),
            shape: "Unknown".to_string(),
            health_score: 5,
            concerns: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

impl StoolAnalysis {
    /// True when none of the three descriptive sections were recognised.
    /// Such a result is still returned to the caller, just logged as a
    /// probable parsing miss.
    pub fn is_all_unknown(&self) -> bool {
        self.color == "Unknown" && self.consistency == "Unknown" && self.shape == "Unknown"
    }
}

/// The payload of one analysis, in either of the two supported shapes.
///
/// Untagged: the JSON shape itself distinguishes the variants
/// (`metrics` + `recommendations` keys vs a single `analysis` key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AnalysisRecord {
    Metrics(MetricReport),
    Report { analysis: StoolAnalysis },
}

/// One entry in the stored history array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    /// Unique entry identifier
    pub id: Uuid,
    /// UTC timestamp of the analysis (RFC 3339)
    pub date: DateTime<Utc>,
    /// Analysis payload, flattened to keep the stored JSON shape
    #[serde(flatten)]
    pub record: AnalysisRecord,
}

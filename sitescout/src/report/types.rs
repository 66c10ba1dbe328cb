//! Report model types.
//!
//! The report is the stable contract with renderers: all numeric
//! derivation happens inside the core, so a renderer needs nothing beyond
//! formatting.

use crate::feature::Category;
use crate::geo::{Coordinate, GeoError};
use crate::rank::RankedFeature;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Outcome of resolving one data category.
///
/// A degraded category is first-class state, never an exception: the
/// renderer must display it explicitly rather than silently omit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryStatus {
    /// Source answered with at least one in-radius feature
    Ok,
    /// Source answered; nothing within the radius
    OkEmpty,
    /// Source timed out or was unreachable
    SourceUnavailable,
    /// Source answered with a malformed or unexpected payload
    SourceError,
}

impl CategoryStatus {
    /// Returns true when the source did not answer usefully.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            CategoryStatus::SourceUnavailable | CategoryStatus::SourceError
        )
    }
}

/// Result for one data category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// Resolution status
    pub status: CategoryStatus,
    /// Query radius used, in kilometers
    pub radius_km: f64,
    /// Ranked features, ascending by distance (empty on degraded status)
    pub features: Vec<RankedFeature>,
    /// Failure detail for degraded sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryResult {
    /// Builds a result from ranked features, deriving Ok/OkEmpty.
    pub fn from_features(radius_km: f64, features: Vec<RankedFeature>) -> Self {
        let status = if features.is_empty() {
            CategoryStatus::OkEmpty
        } else {
            CategoryStatus::Ok
        };
        Self {
            status,
            radius_km,
            features,
            error: None,
        }
    }

    /// Builds a degraded result with an empty feature list.
    pub fn degraded(radius_km: f64, status: CategoryStatus, error: impl Into<String>) -> Self {
        Self {
            status,
            radius_km,
            features: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The unified proximity report.
///
/// Invariant: `categories` contains every requested category exactly once,
/// regardless of individual source failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Query coordinate
    pub query: Coordinate,
    /// Generation timestamp (UTC)
    pub generated_at: DateTime<Utc>,
    /// Effective search radius in kilometers
    pub radius_km: f64,
    /// Per-category results, keyed by stable category name
    pub categories: BTreeMap<Category, CategoryResult>,
}

impl Report {
    /// Returns the result for a category, if it was requested.
    pub fn category(&self, category: Category) -> Option<&CategoryResult> {
        self.categories.get(&category)
    }
}

/// Errors that abort report generation.
///
/// Per-category source failures are not here; they degrade their own
/// [`CategoryResult`] instead. Only invalid input short-circuits before
/// any fetch occurs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// Coordinate or radius failed validation
    #[error("invalid input: {0}")]
    InvalidInput(#[from] GeoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_degraded_classification() {
        assert!(!CategoryStatus::Ok.is_degraded());
        assert!(!CategoryStatus::OkEmpty.is_degraded());
        assert!(CategoryStatus::SourceUnavailable.is_degraded());
        assert!(CategoryStatus::SourceError.is_degraded());
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&CategoryStatus::SourceUnavailable).unwrap(),
            "\"source-unavailable\""
        );
        assert_eq!(
            serde_json::to_string(&CategoryStatus::OkEmpty).unwrap(),
            "\"ok-empty\""
        );
    }

    #[test]
    fn test_from_features_derives_status() {
        let empty = CategoryResult::from_features(15.0, vec![]);
        assert_eq!(empty.status, CategoryStatus::OkEmpty);
        assert!(empty.error.is_none());

        let position = Coordinate::new(31.92, -102.31).unwrap();
        let populated = CategoryResult::from_features(
            15.0,
            vec![RankedFeature {
                name: "Permian Lateral".to_string(),
                position,
                containing: false,
                distance_km: 2.4,
                distance_mi: 1.49,
                bearing_label: "NW".to_string(),
                attributes: serde_json::Map::new(),
            }],
        );
        assert_eq!(populated.status, CategoryStatus::Ok);
    }

    #[test]
    fn test_degraded_result_has_empty_features() {
        let result = CategoryResult::degraded(
            15.0,
            CategoryStatus::SourceUnavailable,
            "request timed out",
        );
        assert!(result.features.is_empty());
        assert_eq!(result.error.as_deref(), Some("request timed out"));
    }

    #[test]
    fn test_category_ordering_follows_declaration() {
        let mut categories = vec![Category::Attainment, Category::Pipelines, Category::Broadband];
        categories.sort();
        assert_eq!(
            categories,
            vec![Category::Pipelines, Category::Broadband, Category::Attainment]
        );
    }

    #[test]
    fn test_report_serializes_category_keys_as_names() {
        let mut categories = BTreeMap::new();
        categories.insert(
            Category::Pipelines,
            CategoryResult::from_features(15.0, vec![]),
        );
        let report = Report {
            query: Coordinate::new(31.9, -102.3).unwrap(),
            generated_at: Utc::now(),
            radius_km: 15.0,
            categories,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["categories"]["pipelines"].is_object());
        assert_eq!(json["categories"]["pipelines"]["status"], "ok-empty");
    }
}

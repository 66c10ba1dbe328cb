//! Candidate feature model shared by source adapters and the ranker.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Data categories the engine can report on.
///
/// Each category is served by one source adapter. The lowercase name is
/// stable: it keys both cache entries and the report's category mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Natural gas pipelines (line geometries)
    Pipelines,
    /// Electric substations (point geometries)
    Substations,
    /// Fiber/broadband availability at the query point
    Broadband,
    /// Incorporated place and county containment
    Jurisdiction,
    /// EPA air-quality attainment status
    Attainment,
}

impl Category {
    /// All categories, in report order.
    pub const ALL: [Category; 5] = [
        Category::Pipelines,
        Category::Substations,
        Category::Broadband,
        Category::Jurisdiction,
        Category::Attainment,
    ];

    /// Stable lowercase name used in cache keys and report output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pipelines => "pipelines",
            Category::Substations => "substations",
            Category::Broadband => "broadband",
            Category::Jurisdiction => "jurisdiction",
            Category::Attainment => "attainment",
        }
    }

    /// Returns true for categories answered by containment or point lookup
    /// rather than distance ranking.
    ///
    /// These rank as a degenerate case: result cap 1, containing features
    /// at distance zero.
    pub fn is_containment(&self) -> bool {
        matches!(
            self,
            Category::Broadband | Category::Jurisdiction | Category::Attainment
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized source record before distance computation.
///
/// Produced by a source adapter from a provider's native response shape.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFeature {
    /// Category this feature belongs to
    pub category: Category,
    /// Human-readable feature name
    pub name: String,
    /// Representative position. For line geometries this is the vertex
    /// nearest the query point, not the centroid.
    pub position: Coordinate,
    /// True when the feature is a polygon containing the query point
    pub containing: bool,
    /// Category-specific attributes (voltage class, operator, providers...)
    pub attributes: Map<String, Value>,
}

impl CandidateFeature {
    /// Creates a feature with an empty attribute map.
    pub fn new(category: Category, name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            category,
            name: name.into(),
            position,
            containing: false,
            attributes: Map::new(),
        }
    }

    /// Marks the feature as a polygon containing the query point.
    pub fn containing(mut self) -> Self {
        self.containing = true;
        self
    }

    /// Adds an attribute, consuming and returning the feature.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

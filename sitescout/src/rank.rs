//! Proximity ranker
//!
//! Turns raw candidate features into distance-ordered results: computes
//! distance and bearing per candidate, drops out-of-radius features,
//! deduplicates overlapping provider tiles, sorts, and truncates.

use crate::feature::CandidateFeature;
use crate::geo::{self, Coordinate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Default result cap per category.
pub const DEFAULT_RESULT_CAP: usize = 10;

/// A candidate feature augmented with computed distance and bearing,
/// relative to a fixed query coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFeature {
    /// Feature name
    pub name: String,
    /// Representative position
    pub position: Coordinate,
    /// True when the feature is a polygon containing the query point
    pub containing: bool,
    /// Great-circle distance from the query point in kilometers
    pub distance_km: f64,
    /// Distance in statute miles
    pub distance_mi: f64,
    /// 16-point compass label from the query point toward the feature
    pub bearing_label: String,
    /// Category-specific attributes carried over from the candidate
    pub attributes: Map<String, Value>,
}

/// Ranks candidate features around a query coordinate.
///
/// Containing polygons rank at distance zero. The same physical asset can
/// appear twice when a provider returns overlapping tiles; duplicates are
/// collapsed by (name, position rounded to 4 decimals), keeping the closer
/// occurrence. Output is sorted ascending by distance with name as the
/// tie-break, truncated to `cap`. An empty result is a valid outcome.
pub fn rank(
    features: Vec<CandidateFeature>,
    origin: &Coordinate,
    radius_km: f64,
    cap: usize,
) -> Vec<RankedFeature> {
    let mut deduped: HashMap<(String, i64, i64), RankedFeature> = HashMap::new();

    for feature in features {
        let distance_km = if feature.containing {
            0.0
        } else {
            geo::distance_km(origin, &feature.position)
        };
        if distance_km > radius_km {
            continue;
        }

        let bearing = geo::bearing_degrees(origin, &feature.position);
        let ranked = RankedFeature {
            name: feature.name,
            position: feature.position,
            containing: feature.containing,
            distance_km,
            distance_mi: geo::km_to_mi(distance_km),
            bearing_label: geo::compass_label(bearing).to_string(),
            attributes: feature.attributes,
        };

        let key = (
            ranked.name.clone(),
            (ranked.position.lat * 1e4).round() as i64,
            (ranked.position.lon * 1e4).round() as i64,
        );
        let keep_new = match deduped.get(&key) {
            Some(existing) => ranked.distance_km < existing.distance_km,
            None => true,
        };
        if keep_new {
            deduped.insert(key, ranked);
        }
    }

    let mut ranked: Vec<RankedFeature> = deduped.into_values().collect();
    ranked.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(cap);
    ranked
}

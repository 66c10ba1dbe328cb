//! Shared helpers for ArcGIS FeatureServer queries.
//!
//! The pipeline and substation registries both expose ArcGIS REST query
//! endpoints; this module builds the common point-plus-distance parameter
//! set and unwraps the common response envelope.

use super::types::FetchError;
use crate::geo::Coordinate;
use serde_json::Value;

/// Builds the standard point-radius query parameters for a FeatureServer
/// layer.
///
/// The spatial filter is a point with a kilometer distance, matching the
/// registries' `esriSRUnit_Kilometer` support; `where_clause` narrows by
/// attribute (`1=1` selects everything).
pub(crate) fn point_query_params(
    point: &Coordinate,
    radius_km: f64,
    where_clause: &str,
) -> Vec<(&'static str, String)> {
    let geometry = serde_json::json!({
        "x": point.lon,
        "y": point.lat,
        "spatialReference": {"wkid": 4326},
    });

    vec![
        ("f", "json".to_string()),
        ("geometry", geometry.to_string()),
        ("geometryType", "esriGeometryPoint".to_string()),
        ("inSR", "4326".to_string()),
        ("spatialRel", "esriSpatialRelIntersects".to_string()),
        ("distance", radius_km.to_string()),
        ("units", "esriSRUnit_Kilometer".to_string()),
        ("outFields", "*".to_string()),
        ("returnGeometry", "true".to_string()),
        ("where", where_clause.to_string()),
    ]
}

/// Parses a FeatureServer response body into its feature array.
///
/// ArcGIS reports failures inside a 200 response as an `error` object, so
/// both transport-level and in-band errors are handled here.
pub(crate) fn parse_feature_array(body: &[u8]) -> Result<Vec<Value>, FetchError> {
    let root: Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::Malformed(format!("response is not JSON: {}", e)))?;

    if let Some(error) = root.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unspecified provider error");
        return Err(FetchError::Unavailable(message.to_string()));
    }

    match root.get("features").and_then(Value::as_array) {
        Some(features) => Ok(features.clone()),
        None => Err(FetchError::Malformed(
            "response has no 'features' array".to_string(),
        )),
    }
}

/// Reads a string attribute, falling back to `default` when absent or null.
pub(crate) fn attr_str(attributes: &Value, key: &str, default: &str) -> String {
    attributes
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

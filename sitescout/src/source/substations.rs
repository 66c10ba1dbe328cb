//! Electric substation source adapter

use super::arcgis::{attr_str, parse_feature_array, point_query_params};
use super::http::AsyncHttpClient;
use super::types::{FetchError, SourceAdapter};
use crate::feature::{CandidateFeature, Category};
use crate::geo::Coordinate;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Default HIFLD electric substation FeatureServer layer.
const DEFAULT_BASE_URL: &str = "https://services1.arcgis.com/Hp6G80Pky0om7QvQ/arcgis/rest/services/Electric_Substations/FeatureServer/0/query";

/// Default minimum voltage class in kV.
///
/// Substations below transmission voltage are not useful for site power
/// access and are excluded from the candidate set entirely.
pub const DEFAULT_MIN_VOLTAGE_KV: f64 = 69.0;

/// Substation registry adapter.
///
/// Queries the HIFLD substation layer near a point. The minimum-voltage
/// threshold is a hard selection criterion, not a ranking criterion: it is
/// pushed into the provider where-clause and re-applied client-side, so a
/// provider that ignores the filter still cannot leak sub-threshold
/// features into ranking.
pub struct SubstationAdapter<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    state: String,
    min_voltage_kv: f64,
}

impl<C: AsyncHttpClient> SubstationAdapter<C> {
    /// Creates a new adapter against the default registry endpoint.
    pub fn new(http_client: C, state: impl Into<String>, min_voltage_kv: f64) -> Self {
        Self::with_base_url(http_client, DEFAULT_BASE_URL.to_string(), state, min_voltage_kv)
    }

    /// Creates a new adapter with a custom endpoint, for testing or
    /// alternative registry mirrors.
    pub fn with_base_url(
        http_client: C,
        base_url: String,
        state: impl Into<String>,
        min_voltage_kv: f64,
    ) -> Self {
        Self {
            http_client,
            base_url,
            state: state.into(),
            min_voltage_kv,
        }
    }

    fn where_clause(&self) -> String {
        format!(
            "STATE = '{}' AND MAX_VOLT >= {}",
            self.state.replace('\'', "''"),
            self.min_voltage_kv
        )
    }
}

#[async_trait]
impl<C: AsyncHttpClient> SourceAdapter for SubstationAdapter<C> {
    async fn fetch(
        &self,
        point: &Coordinate,
        radius_km: f64,
    ) -> Result<Vec<CandidateFeature>, FetchError> {
        let params = point_query_params(point, radius_km, &self.where_clause());
        let body = self.http_client.get(&self.base_url, &params).await?;
        let raw = parse_feature_array(&body)?;

        let mut features = Vec::with_capacity(raw.len());
        for item in &raw {
            let attrs = match item.get("attributes") {
                Some(a) => a,
                None => continue,
            };
            let geometry = match item.get("geometry") {
                Some(g) => g,
                None => continue,
            };
            let (lon, lat) = match (
                geometry.get("x").and_then(Value::as_f64),
                geometry.get("y").and_then(Value::as_f64),
            ) {
                (Some(x), Some(y)) => (x, y),
                _ => continue,
            };
            let position = match Coordinate::new(lat, lon) {
                Ok(p) => p,
                Err(_) => continue,
            };

            let voltage_kv = attrs.get("MAX_VOLT").and_then(Value::as_f64).unwrap_or(0.0);
            // Hard selection criterion: below-threshold features are
            // excluded, never merely ranked lower.
            if voltage_kv < self.min_voltage_kv {
                continue;
            }

            let name = attr_str(attrs, "SUB_NAME", "Unknown Substation");
            let status = attr_str(attrs, "STATUS", "Unknown");

            features.push(
                CandidateFeature::new(Category::Substations, name, position)
                    .with_attribute("voltage_kv", voltage_kv)
                    .with_attribute("status", status),
            );
        }

        debug!(count = features.len(), "substation candidates normalized");
        Ok(features)
    }

    fn category(&self) -> Category {
        Category::Substations
    }

    fn name(&self) -> &str {
        "HIFLD Electric Substations"
    }
}

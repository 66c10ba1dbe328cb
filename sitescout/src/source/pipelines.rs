//! Natural gas pipeline source adapter

use super::arcgis::{attr_str, parse_feature_array, point_query_params};
use super::http::AsyncHttpClient;
use super::types::{FetchError, SourceAdapter};
use crate::feature::{CandidateFeature, Category};
use crate::geo::{self, Coordinate};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Default EIA natural gas pipeline FeatureServer layer.
const DEFAULT_BASE_URL: &str = "https://services1.arcgis.com/Hp6G80Pky0om7QvQ/arcgis/rest/services/Natural_Gas_Pipelines/FeatureServer/0/query";

/// Pipeline registry adapter.
///
/// Queries the EIA natural gas pipeline layer for routes near a point,
/// optionally narrowed to a set of operators. Each polyline is reduced to
/// the route vertex nearest the query point — not the centroid and not the
/// first vertex — so distance to a long linear asset is not overstated.
pub struct PipelineAdapter<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    operators: Vec<String>,
}

impl<C: AsyncHttpClient> PipelineAdapter<C> {
    /// Creates a new adapter against the default registry endpoint.
    ///
    /// `operators` narrows results with a provider-side filter; an empty
    /// list selects all operators.
    pub fn new(http_client: C, operators: Vec<String>) -> Self {
        Self::with_base_url(http_client, DEFAULT_BASE_URL.to_string(), operators)
    }

    /// Creates a new adapter with a custom endpoint, for testing or
    /// alternative registry mirrors.
    pub fn with_base_url(http_client: C, base_url: String, operators: Vec<String>) -> Self {
        Self {
            http_client,
            base_url,
            operators,
        }
    }

    fn where_clause(&self) -> String {
        if self.operators.is_empty() {
            return "1=1".to_string();
        }
        let terms: Vec<String> = self
            .operators
            .iter()
            .map(|op| format!("OPERATOR LIKE '%{}%'", op.replace('\'', "''")))
            .collect();
        format!("({})", terms.join(" OR "))
    }

    /// Finds the route vertex nearest the query point across all paths.
    fn nearest_vertex(geometry: &Value, point: &Coordinate) -> Option<Coordinate> {
        let paths = geometry.get("paths")?.as_array()?;

        let mut best: Option<(f64, Coordinate)> = None;
        for path in paths {
            for vertex in path.as_array()?.iter() {
                let pair = vertex.as_array()?;
                let lon = pair.first()?.as_f64()?;
                let lat = pair.get(1)?.as_f64()?;
                let candidate = Coordinate::new(lat, lon).ok()?;
                let d = geo::distance_km(point, &candidate);
                if best.map(|(bd, _)| d < bd).unwrap_or(true) {
                    best = Some((d, candidate));
                }
            }
        }
        best.map(|(_, c)| c)
    }
}

#[async_trait]
impl<C: AsyncHttpClient> SourceAdapter for PipelineAdapter<C> {
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
            // Routes without usable geometry cannot be ranked; skip them.
            let position = match item
                .get("geometry")
                .and_then(|g| Self::nearest_vertex(g, point))
            {
                Some(p) => p,
                None => continue,
            };

            let name = attr_str(attrs, "PROJ_NAME", "Unknown Pipeline");
            let operator = attr_str(attrs, "OPERATOR", "Unknown Operator");
            let pipe_type = attr_str(attrs, "TYPE", "Unknown Type");

            features.push(
                CandidateFeature::new(Category::Pipelines, name, position)
                    .with_attribute("operator", operator)
                    .with_attribute("type", pipe_type),
            );
        }

        debug!(count = features.len(), "pipeline candidates normalized");
        Ok(features)
    }

    fn category(&self) -> Category {
        Category::Pipelines
    }

    fn name(&self) -> &str {
        "EIA Natural Gas Pipelines"
    }
}

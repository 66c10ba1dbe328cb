//! Broadband availability source adapter

use super::http::AsyncHttpClient;
use super::types::{FetchError, SourceAdapter};
use crate::feature::{CandidateFeature, Category};
use crate::geo::Coordinate;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Default FCC broadband map availability endpoint.
const DEFAULT_BASE_URL: &str = "https://broadbandmap.fcc.gov/api/public/map/listAvailabilities";

/// FCC technology codes that denote fiber-to-the-premises service.
const FIBER_TECH_CODES: [&str; 2] = ["50", "70"];

/// Broadband availability adapter.
///
/// The FCC map is a point lookup, not a radius search: service is reported
/// for the location itself. The adapter collapses the per-provider records
/// into one synthesized feature at the query position summarizing fiber
/// availability, providers, and advertised speeds.
pub struct BroadbandAdapter<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: AsyncHttpClient> BroadbandAdapter<C> {
    /// Creates a new adapter against the default FCC endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a new adapter with a custom endpoint, for testing.
    pub fn with_base_url(http_client: C, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    fn is_fiber(technology: &str) -> bool {
        technology.to_lowercase().contains("fiber") || FIBER_TECH_CODES.contains(&technology)
    }
}

#[async_trait]
impl<C: AsyncHttpClient> SourceAdapter for BroadbandAdapter<C> {
    async fn fetch(
        &self,
        point: &Coordinate,
        _radius_km: f64,
    ) -> Result<Vec<CandidateFeature>, FetchError> {
        let params = [
            ("latitude", point.lat.to_string()),
            ("longitude", point.lon.to_string()),
        ];
        let body = self.http_client.get(&self.base_url, &params).await?;

        let root: Value = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Malformed(format!("response is not JSON: {}", e)))?;
        let results = root
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::Malformed("response has no 'results' array".to_string()))?;

        let mut has_fiber = false;
        let mut providers = BTreeSet::new();
        let mut technologies = BTreeSet::new();
        let mut max_down = 0.0_f64;
        let mut max_up = 0.0_f64;

        for record in results {
            let technology = record
                .get("technology")
                .and_then(Value::as_str)
                .unwrap_or("");
            if !technology.is_empty() {
                technologies.insert(technology.to_string());
            }
            if Self::is_fiber(technology) {
                has_fiber = true;
            }

            if let Some(provider) = record.get("provider_name").and_then(Value::as_str) {
                if !provider.is_empty() {
                    providers.insert(provider.to_string());
                }
            }

            let down = record
                .get("max_advertised_download_speed")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let up = record
                .get("max_advertised_upload_speed")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            max_down = max_down.max(down);
            max_up = max_up.max(up);
        }

        debug!(
            has_fiber,
            providers = providers.len(),
            "broadband availability normalized"
        );

        let feature = CandidateFeature::new(Category::Broadband, "Broadband availability", *point)
            .containing()
            .with_attribute("has_fiber", has_fiber)
            .with_attribute(
                "providers",
                Value::from(providers.into_iter().collect::<Vec<_>>()),
            )
            .with_attribute("max_download_mbps", max_down)
            .with_attribute("max_upload_mbps", max_up)
            .with_attribute(
                "technology_types",
                Value::from(technologies.into_iter().collect::<Vec<_>>()),
            );

        Ok(vec![feature])
    }

    fn category(&self) -> Category {
        Category::Broadband
    }

    fn name(&self) -> &str {
        "FCC National Broadband Map"
    }
}

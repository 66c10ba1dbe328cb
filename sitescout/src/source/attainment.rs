//! EPA air-quality attainment source adapter

use super::http::AsyncHttpClient;
use super::types::{FetchError, SourceAdapter};
use crate::feature::{CandidateFeature, Category};
use crate::geo::Coordinate;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Default Census Bureau geocoder geographies endpoint, used for the
/// county FIPS lookup.
const DEFAULT_GEOCODER_URL: &str =
    "https://geocoding.geo.census.gov/geocoder/geographies/coordinates";

/// Texas counties currently designated nonattainment, by FIPS code.
///
/// Sourced from the EPA Green Book ozone designations. The registry
/// changes on a multi-year cadence, so a compiled-in table is acceptable;
/// update alongside EPA redesignations.
const TEXAS_NONATTAINMENT: [(&str, &[&str]); 6] = [
    ("48085", &["Ozone"]), // Collin County
    ("48113", &["Ozone"]), // Dallas County
    ("48121", &["Ozone"]), // Denton County
    ("48141", &["Ozone"]), // El Paso County
    ("48201", &["Ozone"]), // Harris County
    ("48439", &["Ozone"]), // Tarrant County
];

/// Attainment status adapter.
///
/// Containment by county: resolves the county FIPS for the point via the
/// Census geocoder, then checks it against the EPA nonattainment table.
/// A county absent from the table is in attainment for all criteria
/// pollutants.
pub struct AttainmentAdapter<C: AsyncHttpClient> {
    http_client: C,
    geocoder_url: String,
}

impl<C: AsyncHttpClient> AttainmentAdapter<C> {
    /// Creates a new adapter against the default geocoder endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_geocoder_url(http_client, DEFAULT_GEOCODER_URL.to_string())
    }

    /// Creates a new adapter with a custom endpoint, for testing.
    pub fn with_geocoder_url(http_client: C, geocoder_url: String) -> Self {
        Self {
            http_client,
            geocoder_url,
        }
    }

    fn nonattainment_pollutants(county_fips: &str) -> Vec<String> {
        TEXAS_NONATTAINMENT
            .iter()
            .find(|(fips, _)| *fips == county_fips)
            .map(|(_, pollutants)| pollutants.iter().map(|p| p.to_string()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl<C: AsyncHttpClient> SourceAdapter for AttainmentAdapter<C> {
    async fn fetch(
        &self,
        point: &Coordinate,
        _radius_km: f64,
    ) -> Result<Vec<CandidateFeature>, FetchError> {
        let params = [
            ("x", point.lon.to_string()),
            ("y", point.lat.to_string()),
            ("benchmark", "Public_AR_Current".to_string()),
            ("vintage", "Current_Current".to_string()),
            ("format", "json".to_string()),
        ];
        let body = self.http_client.get(&self.geocoder_url, &params).await?;

        let root: Value = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Malformed(format!("response is not JSON: {}", e)))?;
        let geographies = root
            .pointer("/result/geographies")
            .ok_or_else(|| FetchError::Malformed("response has no geographies".to_string()))?;

        let county = geographies
            .get("Counties")
            .and_then(Value::as_array)
            .and_then(|c| c.first());

        // A well-formed response with no county (offshore, state line
        // artifacts) defaults to attainment, with the gap recorded.
        let (county_name, county_fips) = match county {
            Some(county) => {
                let name = county
                    .get("NAME")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown County")
                    .to_string();
                let fips = match (
                    county.get("STATE").and_then(Value::as_str),
                    county.get("COUNTY").and_then(Value::as_str),
                ) {
                    (Some(state), Some(code)) => Some(format!("{}{}", state, code)),
                    _ => None,
                };
                (name, fips)
            }
            None => ("Unknown County".to_string(), None),
        };

        let pollutants = county_fips
            .as_deref()
            .map(Self::nonattainment_pollutants)
            .unwrap_or_default();
        let attainment = pollutants.is_empty();

        debug!(county = %county_name, attainment, "attainment status resolved");

        let mut feature =
            CandidateFeature::new(Category::Attainment, format!("{}, TX", county_name), *point)
                .containing()
                .with_attribute("attainment", attainment)
                .with_attribute("county", county_name)
                .with_attribute(
                    "pollutants_nonattainment",
                    Value::from(pollutants),
                );
        match county_fips {
            Some(fips) => feature = feature.with_attribute("county_fips", fips),
            None => feature = feature.with_attribute("note", "could not determine county"),
        }

        Ok(vec![feature])
    }

    fn category(&self) -> Category {
        Category::Attainment
    }

    fn name(&self) -> &str {
        "EPA Attainment Status"
    }
}

//! City limits and county jurisdiction source adapter

use super::arcgis::{attr_str, parse_feature_array};
use super::http::AsyncHttpClient;
use super::types::{FetchError, SourceAdapter};
use crate::feature::{CandidateFeature, Category};
use crate::geo::{self, Coordinate};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Default Census Bureau geocoder geographies endpoint.
const DEFAULT_GEOCODER_URL: &str =
    "https://geocoding.geo.census.gov/geocoder/geographies/coordinates";

/// Default TIGERweb incorporated-places layer, used to find the nearest
/// city when the point is outside all boundaries.
const DEFAULT_PLACES_URL: &str = "https://tigerweb.geo.census.gov/arcgis/rest/services/TIGERweb/Places_CouSub_ConCity_SubMCD/MapServer/4/query";

/// Jurisdiction adapter.
///
/// Containment, not distance ranking: the Census geocoder answers "which
/// incorporated place and county contain this point". When no place
/// contains the point, a second query against the TIGERweb places layer
/// finds the nearest incorporated place within the radius, so the report
/// can still state "nearest city: X".
pub struct JurisdictionAdapter<C: AsyncHttpClient> {
    http_client: C,
    geocoder_url: String,
    places_url: String,
}

/// County context shared by the containment and nearest-place results.
#[derive(Debug, Default, Clone)]
struct CountyInfo {
    name: Option<String>,
    fips: Option<String>,
    state: Option<String>,
    tract: Option<String>,
}

impl<C: AsyncHttpClient> JurisdictionAdapter<C> {
    /// Creates a new adapter against the default Census endpoints.
    pub fn new(http_client: C) -> Self {
        Self::with_urls(
            http_client,
            DEFAULT_GEOCODER_URL.to_string(),
            DEFAULT_PLACES_URL.to_string(),
        )
    }

    /// Creates a new adapter with custom endpoints, for testing.
    pub fn with_urls(http_client: C, geocoder_url: String, places_url: String) -> Self {
        Self {
            http_client,
            geocoder_url,
            places_url,
        }
    }

    async fn query_geographies(&self, point: &Coordinate) -> Result<Value, FetchError> {
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
        root.pointer("/result/geographies")
            .cloned()
            .ok_or_else(|| FetchError::Malformed("response has no geographies".to_string()))
    }

    fn county_info(geographies: &Value) -> CountyInfo {
        let mut info = CountyInfo::default();

        if let Some(county) = geographies
            .get("Counties")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
        {
            info.name = county.get("NAME").and_then(Value::as_str).map(String::from);
            info.state = county
                .get("STATE")
                .and_then(Value::as_str)
                .map(String::from);
            if let (Some(state), Some(county_code)) = (
                county.get("STATE").and_then(Value::as_str),
                county.get("COUNTY").and_then(Value::as_str),
            ) {
                info.fips = Some(format!("{}{}", state, county_code));
            }
        }

        info.tract = geographies
            .get("Census Tracts")
            .and_then(Value::as_array)
            .and_then(|t| t.first())
            .and_then(|t| t.get("TRACT"))
            .and_then(Value::as_str)
            .map(String::from);

        info
    }

    fn apply_county(feature: CandidateFeature, county: &CountyInfo) -> CandidateFeature {
        let mut feature = feature;
        if let Some(name) = &county.name {
            feature = feature.with_attribute("county", name.clone());
        }
        if let Some(fips) = &county.fips {
            feature = feature.with_attribute("county_fips", fips.clone());
        }
        if let Some(state) = &county.state {
            feature = feature.with_attribute("state", state.clone());
        }
        if let Some(tract) = &county.tract {
            feature = feature.with_attribute("census_tract", tract.clone());
        }
        feature
    }

    /// Finds the nearest incorporated place within the radius.
    async fn nearest_place(
        &self,
        point: &Coordinate,
        radius_km: f64,
    ) -> Result<Option<(String, Coordinate)>, FetchError> {
        let bbox = geo::bbox_from_point(point, radius_km);
        let params = [
            ("f", "json".to_string()),
            (
                "geometry",
                format!("{},{},{},{}", bbox.west, bbox.south, bbox.east, bbox.north),
            ),
            ("geometryType", "esriGeometryEnvelope".to_string()),
            ("inSR", "4326".to_string()),
            ("spatialRel", "esriSpatialRelIntersects".to_string()),
            ("outFields", "NAME,INTPTLAT,INTPTLON".to_string()),
            ("returnGeometry", "false".to_string()),
            ("where", "1=1".to_string()),
        ];
        let body = self.http_client.get(&self.places_url, &params).await?;
        let raw = parse_feature_array(&body)?;

        let mut best: Option<(f64, String, Coordinate)> = None;
        for item in &raw {
            let attrs = match item.get("attributes") {
                Some(a) => a,
                None => continue,
            };
            let name = attr_str(attrs, "NAME", "");
            if name.is_empty() {
                continue;
            }
            // Interior point fields are strings like "+31.8804296".
            let lat = attrs
                .get("INTPTLAT")
                .and_then(Value::as_str)
                .and_then(|s| s.trim_start_matches('+').parse::<f64>().ok());
            let lon = attrs
                .get("INTPTLON")
                .and_then(Value::as_str)
                .and_then(|s| s.trim_start_matches('+').parse::<f64>().ok());
            let position = match (lat, lon) {
                (Some(lat), Some(lon)) => match Coordinate::new(lat, lon) {
                    Ok(p) => p,
                    Err(_) => continue,
                },
                _ => continue,
            };

            let d = geo::distance_km(point, &position);
            if best.as_ref().map(|(bd, _, _)| d < *bd).unwrap_or(true) {
                best = Some((d, name, position));
            }
        }

        Ok(best.map(|(_, name, position)| (name, position)))
    }
}

#[async_trait]
impl<C: AsyncHttpClient> SourceAdapter for JurisdictionAdapter<C> {
    async fn fetch(
        &self,
        point: &Coordinate,
        radius_km: f64,
    ) -> Result<Vec<CandidateFeature>, FetchError> {
        let geographies = self.query_geographies(point).await?;
        let county = Self::county_info(&geographies);

        let containing_place = geographies
            .get("Incorporated Places")
            .and_then(Value::as_array)
            .and_then(|p| p.first())
            .and_then(|p| p.get("NAME"))
            .and_then(Value::as_str);

        if let Some(name) = containing_place {
            debug!(city = name, "point is inside city limits");
            let feature = CandidateFeature::new(Category::Jurisdiction, name, *point)
                .containing()
                .with_attribute("in_city", true);
            return Ok(vec![Self::apply_county(feature, &county)]);
        }

        // Outside every city polygon: report the nearest one instead.
        match self.nearest_place(point, radius_km).await? {
            Some((name, position)) => {
                debug!(city = %name, "point is outside city limits");
                let feature = CandidateFeature::new(Category::Jurisdiction, name.clone(), position)
                    .with_attribute("in_city", false)
                    .with_attribute("nearest_city", name);
                Ok(vec![Self::apply_county(feature, &county)])
            }
            None => Ok(vec![]),
        }
    }

    fn category(&self) -> Category {
        Category::Jurisdiction
    }

    fn name(&self) -> &str {
        "Census Bureau Geocoder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::http::tests::MockHttpClient;
    use serde_json::json;

    fn origin() -> Coordinate {
        Coordinate::new(31.9, -102.3).unwrap()
    }

    fn geographies_response(places: serde_json::Value) -> serde_json::Value {
        json!({
            "result": {
                "geographies": {
                    "Incorporated Places": places,
                    "Counties": [{"NAME": "Midland County", "STATE": "48", "COUNTY": "329"}],
                    "Census Tracts": [{"TRACT": "010101"}],
                }
            }
        })
    }

    #[tokio::test]
    async fn test_point_inside_city_yields_containing_feature() {
        let mock = MockHttpClient::json(geographies_response(json!([
            {"NAME": "Midland", "STATE": "48"}
        ])));
        let adapter = JurisdictionAdapter::new(mock);

        let features = adapter.fetch(&origin(), 15.0).await.unwrap();

        assert_eq!(features.len(), 1);
        let feature = &features[0];
        assert_eq!(feature.name, "Midland");
        assert!(feature.containing);
        assert_eq!(feature.attributes["in_city"], true);
        assert_eq!(feature.attributes["county"], "Midland County");
        assert_eq!(feature.attributes["county_fips"], "48329");
        assert_eq!(feature.attributes["census_tract"], "010101");
    }

    #[tokio::test]
    async fn test_point_outside_city_yields_nearest_place() {
        let mock = MockHttpClient::sequence(vec![
            Ok(geographies_response(json!([])).to_string().into_bytes()),
            Ok(json!({
                "features": [
                    {"attributes": {"NAME": "Odessa", "INTPTLAT": "+31.8804", "INTPTLON": "-102.3435"}},
                    {"attributes": {"NAME": "Midland", "INTPTLAT": "+31.9973", "INTPTLON": "-102.0779"}},
                ]
            })
            .to_string()
            .into_bytes()),
        ]);
        let adapter = JurisdictionAdapter::new(mock);

        let features = adapter.fetch(&origin(), 30.0).await.unwrap();

        assert_eq!(features.len(), 1);
        let feature = &features[0];
        // Odessa's interior point is nearer to the origin than Midland's
        assert_eq!(feature.name, "Odessa");
        assert!(!feature.containing);
        assert_eq!(feature.attributes["in_city"], false);
        assert_eq!(feature.attributes["nearest_city"], "Odessa");
        assert!(geo::distance_km(&origin(), &feature.position) > 0.0);
    }

    #[tokio::test]
    async fn test_point_outside_city_with_no_places_in_radius() {
        let mock = MockHttpClient::sequence(vec![
            Ok(geographies_response(json!([])).to_string().into_bytes()),
            Ok(json!({"features": []}).to_string().into_bytes()),
        ]);
        let adapter = JurisdictionAdapter::new(mock);

        let features = adapter.fetch(&origin(), 15.0).await.unwrap();
        assert!(features.is_empty());
    }

    #[tokio::test]
    async fn test_missing_geographies_is_malformed() {
        let adapter = JurisdictionAdapter::new(MockHttpClient::json(json!({"result": {}})));
        let err = adapter.fetch(&origin(), 15.0).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_geocoder_request_uses_point_parameters() {
        let mock = MockHttpClient::json(geographies_response(json!([
            {"NAME": "Midland", "STATE": "48"}
        ])));
        let adapter = JurisdictionAdapter::new(mock);
        adapter.fetch(&origin(), 15.0).await.unwrap();

        let requests = adapter.http_client.requests.lock().unwrap();
        assert!(requests[0].contains("x=-102.3"));
        assert!(requests[0].contains("y=31.9"));
        assert!(requests[0].contains("benchmark=Public_AR_Current"));
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let adapter = JurisdictionAdapter::new(MockHttpClient::single(Err(
            FetchError::Network("connection refused".to_string()),
        )));
        let err = adapter.fetch(&origin(), 15.0).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}

//! Geospatial data source abstraction
//!
//! One adapter per data category, each translating its provider's native
//! query dialect (ArcGIS point-radius, FCC point lookup, Census geocoder
//! containment) into the common candidate-feature shape. The aggregator
//! depends only on the [`SourceAdapter`] trait, never on provider types.

mod arcgis;
mod attainment;
mod broadband;
mod http;
mod jurisdiction;
mod pipelines;
mod substations;
mod types;

pub use attainment::AttainmentAdapter;
pub use broadband::BroadbandAdapter;
pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use jurisdiction::JurisdictionAdapter;
pub use pipelines::PipelineAdapter;
pub use substations::{SubstationAdapter, DEFAULT_MIN_VOLTAGE_KV};
pub use types::{FetchError, SourceAdapter};

#[cfg(test)]
pub use http::tests::MockHttpClient;

use crate::config::SourceSettings;
use std::sync::Arc;

/// Builds the full default adapter set from source settings.
///
/// One adapter per category, all sharing the given HTTP client. This is
/// the single place that knows how to wire every production source.
pub fn default_adapters(
    client: ReqwestClient,
    settings: &SourceSettings,
) -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(PipelineAdapter::new(
            client.clone(),
            settings.pipeline_operators.clone(),
        )),
        Arc::new(SubstationAdapter::new(
            client.clone(),
            settings.state.clone(),
            settings.min_voltage_kv,
        )),
        Arc::new(BroadbandAdapter::new(client.clone())),
        Arc::new(JurisdictionAdapter::new(client.clone())),
        Arc::new(AttainmentAdapter::new(client)),
    ]
}

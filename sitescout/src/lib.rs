//! Site Scout - Infrastructure proximity reports for Texas site evaluation
//!
//! Given a GPS coordinate, this library queries independent geospatial
//! registries (pipelines, substations, broadband, jurisdiction, air-quality
//! attainment), computes great-circle distance and compass bearing for each
//! candidate feature, and merges the per-source results into one unified,
//! schema-stable report.
//!
//! # High-Level API
//!
//! ```ignore
//! use sitescout::cache::MemoryCache;
//! use sitescout::config::ScoutConfig;
//! use sitescout::geo::Coordinate;
//! use sitescout::report::ReportAggregator;
//! use sitescout::source::{self, ReqwestClient};
//! use std::sync::Arc;
//!
//! let config = ScoutConfig::load()?;
//! let client = ReqwestClient::with_timeout(config.sources.timeout_secs)?;
//! let adapters = source::default_adapters(client, &config.sources);
//! let aggregator = ReportAggregator::new(adapters, Arc::new(MemoryCache::new()));
//!
//! let point = Coordinate::new(31.9, -102.3)?;
//! let report = aggregator.generate_report(point, 15.0).await?;
//! ```

pub mod cache;
pub mod config;
pub mod feature;
pub mod geo;
pub mod logging;
pub mod rank;
pub mod render;
pub mod report;
pub mod source;

/// Version of the Site Scout library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

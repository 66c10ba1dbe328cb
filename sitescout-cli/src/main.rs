//! Site Scout CLI - Command-line interface
//!
//! This binary provides a command-line interface to the Site Scout
//! library: it parses and validates arguments, wires the default source
//! adapters and cache, and prints the rendered report to stdout.

mod error;

use clap::{Parser, ValueEnum};
use error::CliError;
use sitescout::cache::{FeatureCache, MemoryCache, NoOpCache};
use sitescout::config::ScoutConfig;
use sitescout::geo::Coordinate;
use sitescout::logging;
use sitescout::render;
use sitescout::report::ReportAggregator;
use sitescout::source::{self, ReqwestClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable Markdown report
    Markdown,
    /// Machine-readable JSON report
    Json,
}

#[derive(Parser)]
#[command(name = "sitescout")]
#[command(version = sitescout::VERSION)]
#[command(about = "Infrastructure lookup for Texas coordinates", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Latitude in decimal degrees
    #[arg(long)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long)]
    lon: f64,

    /// Search radius in km (default: from config)
    #[arg(long)]
    radius: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,

    /// Bypass the response cache for this run
    #[arg(long)]
    no_cache: bool,

    /// Config file path (default: ~/.sitescout/config.ini)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        e.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let _logging_guard =
        logging::init_logging(logging::default_log_dir(), logging::default_log_file())
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let config = match &args.config {
        Some(path) => ScoutConfig::load_from(path),
        None => ScoutConfig::load(),
    }
    .map_err(CliError::Config)?;

    // Validate before any query runs; the core re-validates defensively.
    let point = Coordinate::new(args.lat, args.lon).map_err(CliError::InvalidCoordinate)?;
    let radius_km = args.radius.unwrap_or(config.query.default_radius_km);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(CliError::InvalidRadius(radius_km));
    }

    eprintln!(
        "Scouting site at ({:.4}, {:.4}) within {:.0} km radius...",
        point.lat, point.lon, radius_km
    );

    let client =
        ReqwestClient::with_timeout(config.sources.timeout_secs).map_err(CliError::HttpClient)?;
    let adapters = source::default_adapters(client, &config.sources);

    let cache: Arc<dyn FeatureCache> = if args.no_cache {
        Arc::new(NoOpCache::new())
    } else {
        Arc::new(MemoryCache::new())
    };

    let aggregator = ReportAggregator::new(adapters, cache)
        .with_fetch_timeout(config.sources.timeout())
        .with_cache_ttl(config.cache.ttl())
        .with_result_cap(config.query.result_cap);

    let report = aggregator.generate_report(point, radius_km).await?;

    match args.format {
        OutputFormat::Markdown => println!("{}", render::render_markdown(&report)),
        OutputFormat::Json => println!(
            "{}",
            render::render_json(&report).map_err(|e| CliError::Render(e.to_string()))?
        ),
    }

    Ok(())
}

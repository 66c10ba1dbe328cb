//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use sitescout::config::ConfigError;
use sitescout::geo::GeoError;
use sitescout::report::ReportError;
use sitescout::source::FetchError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigError),
    /// Coordinate failed validation
    InvalidCoordinate(GeoError),
    /// Radius failed validation
    InvalidRadius(f64),
    /// Failed to create the HTTP client
    HttpClient(FetchError),
    /// Report generation failed
    Report(ReportError),
    /// Failed to serialize the report
    Render(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::InvalidCoordinate(_) | CliError::InvalidRadius(_) => {
                eprintln!();
                eprintln!("Expected ranges:");
                eprintln!("  --lat     between -90 and 90 (decimal degrees)");
                eprintln!("  --lon     between -180 and 180 (decimal degrees)");
                eprintln!("  --radius  positive kilometers");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Check ~/.sitescout/config.ini or pass --config <path>");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "configuration error: {}", e),
            CliError::InvalidCoordinate(e) => write!(f, "{}", e),
            CliError::InvalidRadius(radius) => {
                write!(f, "invalid radius: {} km (must be positive)", radius)
            }
            CliError::HttpClient(e) => write!(f, "failed to create HTTP client: {}", e),
            CliError::Report(e) => write!(f, "report generation failed: {}", e),
            CliError::Render(msg) => write!(f, "failed to serialize report: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::InvalidCoordinate(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Report(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReportError> for CliError {
    fn from(e: ReportError) -> Self {
        CliError::Report(e)
    }
}

//! Configuration file handling for ~/.sitescout/config.ini.
//!
//! Loads user configuration with sensible defaults. A missing file is not
//! an error; every section and key is optional and falls back to its
//! default.

use ini::Ini;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default search radius in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 15.0;

/// Default per-category result cap.
pub const DEFAULT_RESULT_CAP: usize = 10;

/// Default cache entry time-to-live in seconds (6 hours).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 6 * 3600;

/// Default per-fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default state filter for the substation registry.
pub const DEFAULT_STATE: &str = "TX";

/// Default pipeline operators of interest.
pub const DEFAULT_PIPELINE_OPERATORS: [&str; 2] = ["Kinder Morgan", "Targa"];

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Query default settings.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    /// Search radius in kilometers when the caller does not supply one
    pub default_radius_km: f64,
    /// Maximum features reported per category
    pub result_cap: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_radius_km: DEFAULT_RADIUS_KM,
            result_cap: DEFAULT_RESULT_CAP,
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
}

impl CacheSettings {
    /// Returns the TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Source adapter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Per-fetch timeout in seconds
    pub timeout_secs: u64,
    /// State filter for the substation registry
    pub state: String,
    /// Minimum substation voltage class in kV (hard selection criterion)
    pub min_voltage_kv: f64,
    /// Pipeline operators of interest; empty selects all operators
    pub pipeline_operators: Vec<String>,
}

impl SourceSettings {
    /// Returns the fetch timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            state: DEFAULT_STATE.to_string(),
            min_voltage_kv: crate::source::DEFAULT_MIN_VOLTAGE_KV,
            pipeline_operators: DEFAULT_PIPELINE_OPERATORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Complete Site Scout configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoutConfig {
    pub query: QuerySettings,
    pub cache: CacheSettings,
    pub sources: SourceSettings,
}

impl ScoutConfig {
    /// Load configuration from the default path (~/.sitescout/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("query")) {
            if let Some(value) = section.get("radius_km") {
                config.query.default_radius_km = parse_value("query", "radius_km", value)?;
            }
            if let Some(value) = section.get("result_cap") {
                config.query.result_cap = parse_value("query", "result_cap", value)?;
            }
        }

        if let Some(section) = ini.section(Some("cache")) {
            if let Some(value) = section.get("ttl_secs") {
                config.cache.ttl_secs = parse_value("cache", "ttl_secs", value)?;
            }
        }

        if let Some(section) = ini.section(Some("sources")) {
            if let Some(value) = section.get("timeout_secs") {
                config.sources.timeout_secs = parse_value("sources", "timeout_secs", value)?;
            }
            if let Some(value) = section.get("state") {
                config.sources.state = value.to_string();
            }
            if let Some(value) = section.get("min_voltage_kv") {
                config.sources.min_voltage_kv = parse_value("sources", "min_voltage_kv", value)?;
            }
            if let Some(value) = section.get("pipeline_operators") {
                config.sources.pipeline_operators = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("expected a {}", std::any::type_name::<T>()),
        })
}

/// Get the path to the config directory (~/.sitescout).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sitescout")
}

/// Get the path to the config file (~/.sitescout/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ScoutConfig::default();

        assert_eq!(config.query.default_radius_km, 15.0);
        assert_eq!(config.query.result_cap, 10);
        assert_eq!(config.cache.ttl_secs, 6 * 3600);
        assert_eq!(config.sources.timeout_secs, 30);
        assert_eq!(config.sources.state, "TX");
        assert_eq!(config.sources.min_voltage_kv, 69.0);
        assert_eq!(
            config.sources.pipeline_operators,
            vec!["Kinder Morgan", "Targa"]
        );
    }

    #[test]
    fn test_missing_file_returns_defaults() {
        let config = ScoutConfig::load_from(Path::new("/nonexistent/config.ini")).unwrap();
        assert_eq!(config, ScoutConfig::default());
    }

    #[test]
    fn test_load_overrides_defaults() {
        let file = write_config(
            "[query]\nradius_km = 25\nresult_cap = 5\n\n\
             [cache]\nttl_secs = 600\n\n\
             [sources]\ntimeout_secs = 10\nmin_voltage_kv = 138\n\
             pipeline_operators = Energy Transfer, Oneok\n",
        );

        let config = ScoutConfig::load_from(file.path()).unwrap();

        assert_eq!(config.query.default_radius_km, 25.0);
        assert_eq!(config.query.result_cap, 5);
        assert_eq!(config.cache.ttl_secs, 600);
        assert_eq!(config.sources.timeout_secs, 10);
        assert_eq!(config.sources.min_voltage_kv, 138.0);
        assert_eq!(
            config.sources.pipeline_operators,
            vec!["Energy Transfer", "Oneok"]
        );
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let file = write_config("[query]\nradius_km = 30\n");

        let config = ScoutConfig::load_from(file.path()).unwrap();

        assert_eq!(config.query.default_radius_km, 30.0);
        assert_eq!(config.query.result_cap, DEFAULT_RESULT_CAP);
        assert_eq!(config.cache.ttl_secs, DEFAULT_CACHE_TTL_SECS);
    }

    #[test]
    fn test_invalid_value_is_a_typed_error() {
        let file = write_config("[query]\nradius_km = fifteen\n");

        let err = ScoutConfig::load_from(file.path()).unwrap_err();
        match err {
            ConfigError::InvalidValue { section, key, value, .. } => {
                assert_eq!(section, "query");
                assert_eq!(key, "radius_km");
                assert_eq!(value, "fifteen");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_cache_ttl_duration_conversion() {
        let settings = CacheSettings { ttl_secs: 90 };
        assert_eq!(settings.ttl(), Duration::from_secs(90));
    }

    #[test]
    fn test_config_paths() {
        assert!(config_directory().ends_with(".sitescout"));
        assert!(config_file_path().ends_with(".sitescout/config.ini"));
    }
}

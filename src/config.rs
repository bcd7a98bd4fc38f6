/// Service configuration loader - parses vhi.toml
///
/// Separates download endpoints, year windows, storage location and drought
/// criteria from code so they can be adjusted without recompiling the
/// service. Every field has a default, so a missing file yields a working
/// configuration.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "vhi.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VhiConfig {
    pub download: DownloadSettings,
    pub storage: StorageSettings,
    pub drought: DroughtSettings,
    pub endpoint: EndpointSettings,
    pub logging: LoggingSettings,
}

/// Where and what to fetch from the NOAA STAR VH service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    pub base_url: String,
    pub country: String,
    pub year_from: i32,
    pub year_to: i32,
    /// Series aggregation requested from NOAA ("Mean" or "VHI_Parea").
    pub series_type: String,
    pub workers: usize,
    pub timeout_secs: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.star.nesdis.noaa.gov/smcd/emb/vci/VH/get_TS_admin.php".to_string(),
            country: "UKR".to_string(),
            year_from: 1981,
            year_to: 2024,
            series_type: "Mean".to_string(),
            workers: 4,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Default drought criteria; the detector accepts overrides per call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DroughtSettings {
    pub threshold: f64,
    pub min_region_count: usize,
}

impl Default for DroughtSettings {
    fn default() -> Self {
        Self {
            threshold: 15.0,
            min_region_count: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub port: u16,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl VhiConfig {
    /// Parses configuration from TOML text and validates it.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: VhiConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no run could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.download.year_from > self.download.year_to {
            return Err(ConfigError::Invalid(format!(
                "download.year_from ({}) is after download.year_to ({})",
                self.download.year_from, self.download.year_to
            )));
        }
        if self.download.workers == 0 {
            return Err(ConfigError::Invalid("download.workers must be at least 1".to_string()));
        }
        if self.drought.min_region_count == 0 {
            return Err(ConfigError::Invalid(
                "drought.min_region_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads configuration from `path`, or from `VHI_CONFIG` / `vhi.toml` when
/// no path is given.
///
/// A `.env` file is honoured if present. A missing configuration file is
/// not an error: the built-in defaults are used. `VHI_DATA_DIR` overrides
/// the storage directory either way.
pub fn load_config(path: Option<&Path>) -> Result<VhiConfig, ConfigError> {
    dotenv::dotenv().ok();

    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => env::var("VHI_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
    };

    let mut config = if config_path.exists() {
        let contents = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        VhiConfig::from_toml_str(&contents, &config_path)?
    } else if path.is_some() {
        // An explicitly requested file must exist.
        return Err(ConfigError::Read {
            path: config_path,
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    } else {
        tracing::debug!("{} not found, using built-in defaults", config_path.display());
        VhiConfig::default()
    };

    if let Ok(dir) = env::var("VHI_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_noaa_service() {
        let config = VhiConfig::default();
        assert_eq!(config.download.country, "UKR");
        assert_eq!(config.download.year_from, 1981);
        assert_eq!(config.download.year_to, 2024);
        assert_eq!(config.download.series_type, "Mean");
        assert_eq!(config.drought.threshold, 15.0);
        assert_eq!(config.drought.min_region_count, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_fields() {
        let toml = r#"
[download]
year_to = 2023
workers = 8

[drought]
threshold = 20.0
"#;
        let config = VhiConfig::from_toml_str(toml, Path::new("inline.toml"))
            .expect("partial config should parse");
        assert_eq!(config.download.year_to, 2023);
        assert_eq!(config.download.workers, 8);
        assert_eq!(config.download.year_from, 1981, "unset field keeps its default");
        assert_eq!(config.drought.threshold, 20.0);
        assert_eq!(config.drought.min_region_count, 5);
        assert_eq!(config.endpoint.port, 8080);
    }

    #[test]
    fn test_inverted_year_window_is_rejected() {
        let toml = "[download]\nyear_from = 2020\nyear_to = 2010\n";
        let err = VhiConfig::from_toml_str(toml, Path::new("inline.toml"))
            .expect_err("inverted window should fail validation");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let toml = "[download]\nworkers = 0\n";
        assert!(VhiConfig::from_toml_str(toml, Path::new("inline.toml")).is_err());
    }

    #[test]
    fn test_malformed_toml_reports_path() {
        let err = VhiConfig::from_toml_str("[download\n", Path::new("broken.toml"))
            .expect_err("malformed TOML should fail");
        assert!(err.to_string().contains("broken.toml"), "got: {}", err);
    }

    #[test]
    fn test_load_config_reads_repository_file() {
        let config = load_config(Some(Path::new(DEFAULT_CONFIG_PATH)))
            .expect("vhi.toml at the crate root should load");
        assert_eq!(config.download.country, "UKR");
        assert!(config.download.workers >= 1);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = load_config(Some(Path::new("does-not-exist.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}

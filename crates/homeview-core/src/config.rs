//! Configuration for the dashboard
//!
//! Input locations, server address, hypothesis verdict tolerance, and map
//! styling. Every field has a default, so a config file only needs the
//! values it changes.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the listen address
pub const ADDR_ENV_VAR: &str = "HOMEVIEW_ADDR";

/// King County zip code boundaries
pub const DEFAULT_GEOJSON_URL: &str =
    "https://opendata.arcgis.com/datasets/83fc2e72903343aabff6de8cb445b81c_2.geojson";

/// Dashboard-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Input file locations
    pub data: DataConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Hypothesis evaluation settings
    pub analysis: AnalysisConfig,
    /// Map rendering settings
    pub map: MapConfig,
}

/// Input file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// House listings CSV
    pub houses: PathBuf,
    /// Buy recommendation report CSV (with lat/long)
    pub buy_report: PathBuf,
    /// Sell recommendation report CSV
    pub sell_report: PathBuf,
    /// Zip code boundaries: a local path or an http(s) URL
    pub geojson: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            houses: PathBuf::from("kc_house_data.csv"),
            buy_report: PathBuf::from("kc_house_buy_report_geo.csv"),
            sell_report: PathBuf::from("kc_house_sell_report.csv"),
            geojson: DEFAULT_GEOJSON_URL.to_string(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Hypothesis evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How far past the claimed effect an observation may go and still hold,
    /// as a fraction of the claim (1.0 accepts up to twice the claim)
    pub verdict_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            verdict_tolerance: 1.0,
        }
    }
}

/// Map rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial Leaflet zoom level
    pub zoom_start: u8,
    /// Marker cluster grid cell size in degrees
    pub cluster_cell_degrees: f64,
    /// Choropleth fill opacity
    pub fill_opacity: f64,
    /// Choropleth boundary line opacity
    pub line_opacity: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_start: 10,
            cluster_cell_degrees: 0.05,
            fill_opacity: 0.7,
            line_opacity: 0.2,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Default config file location: `<config dir>/homeview/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("homeview").join("config.toml"))
    }

    /// Load from `path`, else from the default location if it exists, else defaults
    ///
    /// The `HOMEVIEW_ADDR` override is applied and the result validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::read_file(&path)?,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        if let Ok(addr) = std::env::var(ADDR_ENV_VAR) {
            config.server.addr = addr;
        }

        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.server.addr.clone()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.map.fill_opacity) {
            return Err(ConfigError::OutOfRange(
                "fill_opacity must be between 0.0 and 1.0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.map.line_opacity) {
            return Err(ConfigError::OutOfRange(
                "line_opacity must be between 0.0 and 1.0".to_string(),
            ));
        }

        if !(self.map.cluster_cell_degrees > 0.0) {
            return Err(ConfigError::OutOfRange(
                "cluster_cell_degrees must be positive".to_string(),
            ));
        }

        if !(self.analysis.verdict_tolerance >= 0.0) {
            return Err(ConfigError::OutOfRange(
                "verdict_tolerance must not be negative".to_string(),
            ));
        }

        self.socket_addr()?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Cannot read config file {path}: {message}")]
    Read { path: String, message: String },

    /// Config text is not valid TOML for this schema
    #[error("Cannot parse config: {0}")]
    Parse(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Listen address is not `host:port`
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.map.fill_opacity, 0.7);
        assert_eq!(config.map.line_opacity, 0.2);
        assert_eq!(config.data.geojson, DEFAULT_GEOJSON_URL);
    }

    #[test]
    fn test_partial_toml() {
        let config = DashboardConfig::from_toml(
            r#"
            [analysis]
            verdict_tolerance = 0.5

            [data]
            houses = "/srv/data/houses.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.verdict_tolerance, 0.5);
        assert_eq!(config.data.houses, PathBuf::from("/srv/data/houses.csv"));
        assert_eq!(config.data.sell_report, PathBuf::from("kc_house_sell_report.csv"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DashboardConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(DashboardConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_out_of_range() {
        let mut config = DashboardConfig::default();
        config.map.fill_opacity = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));

        let mut config = DashboardConfig::default();
        config.map.cluster_cell_degrees = 0.0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.analysis.verdict_tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_address() {
        let mut config = DashboardConfig::default();
        config.server.addr = "not an address".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidAddress("not an address".to_string()))
        );
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[map]\nzoom_start = 12").unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.map.zoom_start, 12);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DashboardConfig::load(Some(Path::new("/nonexistent/homeview.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

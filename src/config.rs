use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::GroundStation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub stations: Vec<GroundStation>,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub tle_folder: PathBuf,
}

/// Knobs for the visibility scan. The 6371 km Earth radius documents the
/// spherical approximation the whole computation shares.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_step_seconds")]
    pub step_seconds: u32,
    #[serde(default = "default_horizon_minutes")]
    pub horizon_minutes: u32,
    #[serde(default = "default_min_elevation_deg")]
    pub min_elevation_deg: f64,
    #[serde(default = "default_earth_radius_km")]
    pub earth_radius_km: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            step_seconds: default_step_seconds(),
            horizon_minutes: default_horizon_minutes(),
            min_elevation_deg: default_min_elevation_deg(),
            earth_radius_km: default_earth_radius_km(),
        }
    }
}

fn default_step_seconds() -> u32 {
    10
}

fn default_horizon_minutes() -> u32 {
    1440
}

fn default_min_elevation_deg() -> f64 {
    10.0
}

fn default_earth_radius_km() -> f64 {
    6371.0
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_max_concurrent_pairs")]
    pub max_concurrent_pairs: usize,
    #[serde(default = "default_pair_timeout_seconds")]
    pub pair_timeout_seconds: u64,
}

impl RefreshConfig {
    pub fn pair_timeout(&self) -> Duration {
        Duration::from_secs(self.pair_timeout_seconds)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pairs: default_max_concurrent_pairs(),
            pair_timeout_seconds: default_pair_timeout_seconds(),
        }
    }
}

fn default_max_concurrent_pairs() -> usize {
    8
}

fn default_pair_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_folder: PathBuf,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_documented_defaults() {
        let yaml = r#"
catalog:
  tle_folder: tle/
stations:
  - id: gs-main
    latitude_deg: 52.4
    longitude_deg: 9.7
store:
  base_folder: windows/
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.prediction.step_seconds, 10);
        assert_eq!(config.prediction.horizon_minutes, 1440);
        assert_eq!(config.prediction.min_elevation_deg, 10.0);
        assert_eq!(config.prediction.earth_radius_km, 6371.0);
        assert_eq!(config.refresh.max_concurrent_pairs, 8);
        assert_eq!(config.refresh.pair_timeout_seconds, 30);
        assert_eq!(config.stations[0].altitude_m, 0.0);
        assert!(config.stations[0].name.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let yaml = r#"
catalog:
  tle_folder: tle/
stations: []
prediction:
  step_seconds: 30
  min_elevation_deg: 5.0
refresh:
  max_concurrent_pairs: 2
store:
  base_folder: windows/
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.prediction.step_seconds, 30);
        assert_eq!(config.prediction.min_elevation_deg, 5.0);
        assert_eq!(config.prediction.horizon_minutes, 1440);
        assert_eq!(config.refresh.max_concurrent_pairs, 2);
    }
}

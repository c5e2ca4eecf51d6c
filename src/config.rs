// src/config.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::telemetry::DEFAULT_CAPACITY;
use crate::types::{LabelZone, OrderingPolicy, SourceMode};

pub const DEFAULT_ENDPOINT: &str = "https://agrovision-contributed.onrender.com/data";
/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "AGROVISION_CONFIG";
const CANDIDATES: [&str; 2] = ["agrovision.toml", "config/agrovision.toml"];

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub endpoint: String,
    pub interval_ms: u64,
    pub request_timeout_ms: u64,
    pub capacity: usize,
    pub time_zone: LabelZone,
    pub ordering: OrderingPolicy,
    pub source: SourceMode,
    pub log_level: String,
    pub chart_height: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            interval_ms: 5000,
            request_timeout_ms: 4000,
            capacity: DEFAULT_CAPACITY,
            time_zone: LabelZone::Local,
            ordering: OrderingPolicy::AcceptAll,
            source: SourceMode::Remote,
            log_level: "info".to_owned(),
            chart_height: 400.0,
        }
    }
}

impl MonitorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: MonitorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// First config file found: `$AGROVISION_CONFIG`, then the working directory.
    pub fn locate() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        CANDIDATES
            .into_iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            bail!("interval_ms must be greater than zero");
        }
        if self.capacity == 0 {
            bail!("capacity must be greater than zero");
        }
        if self.source == SourceMode::Remote && self.endpoint.trim().is_empty() {
            bail!("endpoint must be set when source = \"remote\"");
        }
        if !(self.chart_height.is_finite() && self.chart_height > 0.0) {
            bail!("chart_height must be a positive number");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_widget() {
        let config = MonitorConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.interval(), Duration::from_secs(5));
        assert_eq!(config.capacity, 10);
        assert_eq!(config.ordering, OrderingPolicy::AcceptAll);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = MonitorConfig::parse(
            r#"
            interval_ms = 1500
            time_zone = "utc"
            ordering = "drop_stale"
            source = "simulation"
            "#,
        )
        .unwrap();
        assert_eq!(config.interval_ms, 1500);
        assert_eq!(config.time_zone, LabelZone::Utc);
        assert_eq!(config.ordering, OrderingPolicy::DropStale);
        assert_eq!(config.source, SourceMode::Simulation);
        assert_eq!(config.capacity, 10);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn rejects_zero_interval_and_capacity() {
        assert!(MonitorConfig::parse("interval_ms = 0").is_err());
        assert!(MonitorConfig::parse("capacity = 0").is_err());
    }

    #[test]
    fn empty_endpoint_only_matters_for_remote() {
        assert!(MonitorConfig::parse("endpoint = \"\"").is_err());
        assert!(MonitorConfig::parse("endpoint = \"\"\nsource = \"simulation\"").is_ok());
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(MonitorConfig::parse("ordering = \"newest_first\"").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = MonitorConfig::load("definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}

use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

use crate::feed::{DEFAULT_TTL, DEFAULT_URL_TEMPLATE};
use crate::propagator::{PropagatorSettings, DEFAULT_TICK_INTERVAL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub feed: FeedConfig,
    pub propagator: PropagatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:4000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Upstream URL with `{set}` where the set name goes.
    pub url_template: String,
    pub default_set: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub ttl: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            default_set: "active".to_string(),
            ttl: DEFAULT_TTL,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PropagatorConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub tick_interval: Duration,
    pub time_scale: f64,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            time_scale: 1.0,
        }
    }
}

impl PropagatorConfig {
    pub fn settings(&self) -> PropagatorSettings {
        PropagatorSettings {
            tick_interval: self.tick_interval,
            time_scale: self.time_scale,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.propagator.tick_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "propagator.tick_interval must be positive".into(),
            ));
        }
        if !self.propagator.time_scale.is_finite() {
            return Err(ConfigError::Invalid(
                "propagator.time_scale must be finite".into(),
            ));
        }
        if self.feed.timeout.is_zero() {
            return Err(ConfigError::Invalid("feed.timeout must be positive".into()));
        }
        Ok(())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::error::ConfigError;
use crate::services::MonitorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default sampling interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 200;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Sampling settings
    pub sampling: SamplingConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
}

/// Sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Interval between sampling passes in milliseconds
    pub interval_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl SamplingConfig {
    /// Interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Check values that cannot be expressed in the types
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sampling.interval_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Sampling loop settings derived from this configuration
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            interval: self.sampling.interval(),
            ..MonitorConfig::default()
        }
    }
}

use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// Settings for a sieve run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SieveConfig {
    /// Linear threshold; shapes and holes with an area at or below resolution² are sieved
    #[schemars(range(min = 0.0))]
    pub resolution: f64,
    /// Replace sieved polygons by their centroid instead of dropping them
    pub replace_with_centroid: bool,
    /// Features committed per page by targets built from this config
    #[schemars(range(min = 1))]
    pub page_size: usize,
    /// Capacity of the channels between pipeline stages
    #[schemars(range(min = 1))]
    pub channel_capacity: usize,
    /// Memory limit of the target in megabytes, reported only
    pub memory_limit_mb: Option<f64>,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            resolution: 0.0,
            replace_with_centroid: true,
            page_size: 1000,
            channel_capacity: 64,
            memory_limit_mb: None,
        }
    }
}

impl SieveConfig {
    /// Area threshold derived from the resolution
    pub fn min_area(&self) -> f64 {
        self.resolution * self.resolution
    }

    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution < 0.0 {
            return Err(SieveError::InvalidConfig(format!(
                "resolution must be a finite number >= 0, got {}",
                self.resolution
            )));
        }
        if self.page_size == 0 {
            return Err(SieveError::InvalidConfig("page_size must be at least 1".to_string()));
        }
        if self.channel_capacity == 0 {
            return Err(SieveError::InvalidConfig(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if let Some(limit) = self.memory_limit_mb {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(SieveError::InvalidConfig(format!(
                    "memory_limit_mb must be a positive number, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }

    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SieveConfig)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&fs::read_to_string(path)?),
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(SieveError::UnsupportedConfigFormat(path.to_path_buf())),
        }
    }
}

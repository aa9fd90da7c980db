use crate::constants;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub collector: CollectorConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Maximum number of posts requested per source
    pub limit_per_source: usize,
    /// Posts with a body of this many characters or fewer are dropped
    pub min_body_length: usize,
    /// Flat delay inserted after each source is processed
    pub delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            limit_per_source: 3000,
            min_body_length: 50,
            delay_ms: 1000,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub raw_dir: String,
    pub processed_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raw_dir: constants::RAW_DATA_DIR.to_string(),
            processed_dir: constants::PROCESSED_DATA_DIR.to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to the
    /// built-in defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config_manager::detection::DetectionConfig;
use crate::config_manager::system::SystemConfig;
use crate::config_manager::translation::TranslationConfig;

/// Main configuration for the gateway. JSON-LD, JSON and YAML files are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "@context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub context: Option<serde_json::Value>,

    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "detection_config")]
    #[serde(default)]
    pub detection_config: DetectionConfig,

    #[serde(rename = "translation_config")]
    #[serde(default)]
    pub translation_config: TranslationConfig,
}

impl Config {
    /// Load configuration from a single file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{read_config_value, validate_config};
        let json_value = read_config_value(path)?;
        validate_config(json_value)
    }

    /// Load from the first path that exists. Returns the path that was used,
    /// or defaults when none of the candidates exist.
    pub fn load_first(paths: &[String]) -> anyhow::Result<(Self, Option<String>)> {
        for path in paths {
            if !std::path::Path::new(path).exists() {
                debug!("Config candidate {} does not exist", path);
                continue;
            }
            let config = Self::load(path)?;
            return Ok((config, Some(path.clone())));
        }

        let config = Self::default();
        config.validate()?;
        Ok((config, None))
    }

    /// Apply `DETECTION_SERVICE_URL` and `PORT` overrides
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(url) = std::env::var("DETECTION_SERVICE_URL") {
            self.detection_config.base_url = url;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.system_config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT={} is not a valid port: {}", port, e))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.system_config
            .validate()
            .and_then(|_| self.detection_config.validate())
            .and_then(|_| self.translation_config.validate())
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))
    }
}

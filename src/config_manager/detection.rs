use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the external object-detection backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(rename = "base_url")]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(rename = "detect_path")]
    #[serde(default = "default_detect_path")]
    pub detect_path: String,

    #[serde(rename = "health_path")]
    #[serde(default = "default_health_path")]
    pub health_path: String,

    #[serde(rename = "timeout_secs")]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect_timeout_secs")]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_detect_path() -> String {
    "/detect".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl DetectionConfig {
    pub fn detect_url(&self) -> String {
        join_url(&self.base_url, &self.detect_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("detection base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err("detection timeouts must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            detect_path: default_detect_path(),
            health_path: default_health_path(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

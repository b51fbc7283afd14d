use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// System configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(rename = "static_dir")]
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Upper bound on the multipart body accepted by `/upload`
    #[serde(rename = "max_upload_bytes")]
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Deadline applied to each gateway operation
    #[serde(rename = "request_timeout_secs")]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be between 1 and 65535".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be > 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn static_path(&self) -> PathBuf {
        PathBuf::from(&self.static_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_path().join("index.html")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

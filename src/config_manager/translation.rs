use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the translation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the service-account JSON blob
    #[serde(rename = "credentials_env")]
    #[serde(default = "default_credentials_env")]
    pub credentials_env: String,

    /// Overrides the `token_uri` from the credentials when set
    #[serde(rename = "token_uri")]
    #[serde(default)]
    pub token_uri: Option<String>,

    #[serde(rename = "max_concurrent_requests")]
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    #[serde(rename = "timeout_secs")]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_credentials_env() -> String {
    "GOOGLE_APPLICATION_CREDENTIALS_JSON".to_string()
}

fn default_max_concurrent_requests() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    30
}

impl TranslationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("translation endpoint must not be empty".to_string());
        }
        if self.max_concurrent_requests == 0 {
            return Err("max_concurrent_requests must be >= 1".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("translation timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            credentials_env: default_credentials_env(),
            token_uri: None,
            max_concurrent_requests: default_max_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

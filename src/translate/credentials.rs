use serde::Deserialize;
use std::fmt;

use crate::errors::CredentialsError;

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Google service-account key, as downloaded from the cloud console
#[derive(Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    #[serde(rename = "type")]
    pub account_type: String,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub private_key_id: Option<String>,

    /// PEM encoded RSA key
    pub private_key: String,

    pub client_email: String,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountCredentials {
    /// Parse and check a credentials blob
    pub fn from_json(blob: &str) -> Result<Self, CredentialsError> {
        let credentials: Self = serde_json::from_str(blob)?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Read the blob from the named environment variable
    pub fn from_env(var: &str) -> Result<Self, CredentialsError> {
        let blob = std::env::var(var).map_err(|_| CredentialsError::Missing(var.to_string()))?;
        if blob.trim().is_empty() {
            return Err(CredentialsError::Missing(var.to_string()));
        }
        Self::from_json(&blob)
    }

    fn validate(&self) -> Result<(), CredentialsError> {
        if self.account_type != SERVICE_ACCOUNT_TYPE {
            return Err(CredentialsError::UnsupportedType(self.account_type.clone()));
        }
        if self.client_email.trim().is_empty() {
            return Err(CredentialsError::EmptyField("client_email"));
        }
        if self.private_key.trim().is_empty() {
            return Err(CredentialsError::EmptyField("private_key"));
        }
        if self.token_uri.trim().is_empty() {
            return Err(CredentialsError::EmptyField("token_uri"));
        }
        Ok(())
    }
}

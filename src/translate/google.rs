use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::credentials::ServiceAccountCredentials;
use super::interface::TranslationProvider;
use crate::config_manager::TranslationConfig;
use crate::errors::{CredentialsError, TranslationError};

const TRANSLATION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-translation";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
/// Tokens are refreshed this long before the provider says they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Exchanges signed service-account assertions for OAuth2 access tokens
pub struct TokenSource {
    client: Client,
    client_email: String,
    token_uri: String,
    header: Header,
    key: EncodingKey,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(
        client: Client,
        credentials: &ServiceAccountCredentials,
        token_uri_override: Option<&str>,
    ) -> Result<Self, CredentialsError> {
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
        let mut header = Header::new(Algorithm::RS256);
        header.kid = credentials.private_key_id.clone();

        Ok(Self {
            client,
            client_email: credentials.client_email.clone(),
            token_uri: token_uri_override
                .map(str::to_string)
                .unwrap_or_else(|| credentials.token_uri.clone()),
            header,
            key,
            cached: RwLock::new(None),
        })
    }

    /// Return a valid access token, fetching a new one when the cache is stale
    pub async fn access_token(&self) -> Result<String, TranslationError> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    fn sign_assertion(&self) -> Result<String, TranslationError> {
        let iat = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TranslationError::Auth(format!("system clock before epoch: {}", e)))?
            .as_secs();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: TRANSLATION_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&self.header, &claims, &self.key)
            .map_err(|e| TranslationError::Auth(format!("failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> Result<CachedToken, TranslationError> {
        let assertion = self.sign_assertion()?;
        debug!("Requesting access token from {}", self.token_uri);

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(TranslationError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token endpoint responded with {}: {}", status, body);
            return Err(TranslationError::Auth(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Auth(format!("invalid token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        info!("Obtained translation access token valid for {}s", token.expires_in);

        Ok(CachedToken {
            access_token: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: [&'a str; 1],
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedText {
    translated_text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

/// Google Cloud Translation (v2 REST) provider
pub struct GoogleTranslateProvider {
    client: Client,
    endpoint: String,
    tokens: TokenSource,
}

impl GoogleTranslateProvider {
    pub fn new(
        config: &TranslationConfig,
        credentials: &ServiceAccountCredentials,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        let tokens = TokenSource::new(client.clone(), credentials, config.token_uri.as_deref())?;

        info!(
            "Initialized Google translation provider: endpoint={}, account={}",
            config.endpoint, credentials.client_email
        );

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            tokens,
        })
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&TranslateBody {
                q: [text],
                target: target_language,
                format: "text",
            })
            .send()
            .await
            .map_err(TranslationError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Decode(e.to_string()))?;

        Ok(parsed
            .data
            .translations
            .into_iter()
            .map(|t| {
                if let Some(source) = &t.detected_source_language {
                    debug!("{:?} detected as {} -> {}", text, source, target_language);
                }
                t.translated_text
            })
            .collect())
    }
}

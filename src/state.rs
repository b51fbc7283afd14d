use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config_manager::Config;
use crate::detection::{DetectionClient, DetectionInterface};
use crate::gateway::Gateway;
use crate::translate::{
    GoogleTranslateProvider, ServiceAccountCredentials, TranslationClient, TranslationProvider,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<Gateway>,
    /// Cancelled on shutdown; every request works under a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build the production collaborators. Missing or malformed translation
    /// credentials are an error here, before the server binds.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let translation_config = &config.translation_config;
        let credentials = ServiceAccountCredentials::from_env(&translation_config.credentials_env)
            .map_err(|e| anyhow::anyhow!("Failed to load translation credentials: {}", e))?;
        info!(
            "Loaded service account {} (project {})",
            credentials.client_email,
            credentials.project_id.as_deref().unwrap_or("unknown")
        );

        let provider = Arc::new(GoogleTranslateProvider::new(translation_config, &credentials)?);
        let detector = Arc::new(DetectionClient::new(&config.detection_config)?);
        info!("Detection backend at {}", detector.detect_url());

        Ok(Self::with_collaborators(config, detector, provider))
    }

    /// Wire the gateway around explicit collaborators
    pub fn with_collaborators(
        config: Config,
        detector: Arc<dyn DetectionInterface>,
        provider: Arc<dyn TranslationProvider>,
    ) -> Self {
        let translator =
            TranslationClient::new(provider, config.translation_config.max_concurrent_requests);
        let gateway = Gateway::new(detector, translator, config.system_config.request_timeout());

        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

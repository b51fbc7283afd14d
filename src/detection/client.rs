use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::interface::{DetectionInterface, DetectionRequest, DetectionResult};
use crate::config_manager::DetectionConfig;
use crate::errors::DetectionError;

/// HTTP client for the detection backend
#[derive(Debug, Clone)]
pub struct DetectionClient {
    client: Client,
    detect_url: String,
    health_url: String,
}

impl DetectionClient {
    pub fn new(config: &DetectionConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            detect_url: config.detect_url(),
            health_url: config.health_url(),
        })
    }

    pub fn detect_url(&self) -> &str {
        &self.detect_url
    }
}

#[async_trait]
impl DetectionInterface for DetectionClient {
    async fn detect(&self, encoded_image: &str) -> Result<DetectionResult, DetectionError> {
        debug!(
            "Sending detection request to {} ({} encoded bytes)",
            self.detect_url,
            encoded_image.len()
        );

        let response = self
            .client
            .post(&self.detect_url)
            .json(&DetectionRequest {
                image: encoded_image,
            })
            .send()
            .await
            .map_err(DetectionError::Connection)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Detection backend responded with {}", status);
            return Err(DetectionError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(DetectionError::Connection)?;
        let result: DetectionResult = serde_json::from_slice(&body)
            .map_err(|e| DetectionError::Decode(e.to_string()))?;

        debug!("Detection backend returned {} detections", result.detections.len());
        Ok(result)
    }

    async fn health_check(&self) -> bool {
        match self.client.get(&self.health_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Detection backend health check failed: {}", e);
                false
            }
        }
    }
}

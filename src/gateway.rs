//! Request orchestration between the HTTP surface and the two collaborators.
//!
//! Every call is a stateless request/response cycle: the gateway holds only
//! read-only handles built at startup. Failures from a collaborator are logged
//! here with full detail and handed to the caller as a [`GatewayError`] whose
//! payload carries a fixed message.

use axum::body::Bytes;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::detection::{DetectionInterface, DetectionResult};
use crate::errors::{DetectionError, GatewayError, TranslationError};
use crate::translate::{TranslationClient, TranslationRequest};
use crate::utils::image_encoding;

/// A file received in the `image` multipart field
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

pub struct Gateway {
    detector: Arc<dyn DetectionInterface>,
    translator: TranslationClient,
    request_timeout: Duration,
}

impl Gateway {
    pub fn new(
        detector: Arc<dyn DetectionInterface>,
        translator: TranslationClient,
        request_timeout: Duration,
    ) -> Self {
        Self {
            detector,
            translator,
            request_timeout,
        }
    }

    /// Encode an upload, run it through the detection backend and wrap the
    /// result in the one-element array the `/upload` contract returns.
    pub async fn handle_detect(
        &self,
        upload: Option<Upload>,
        cancel: &CancellationToken,
    ) -> Result<Vec<DetectionResult>, GatewayError> {
        let span = info_span!("detect", request_id = %Uuid::new_v4());
        async move {
            let upload = upload.ok_or_else(|| {
                warn!("Upload request without an image field");
                GatewayError::InvalidUpload("no image field".to_string())
            })?;

            info!(
                "Received image {:?} ({}, {} bytes)",
                upload.file_name,
                upload.content_type.as_deref().unwrap_or("unknown type"),
                upload.bytes.len()
            );

            let encoded = image_encoding::encode(&upload.bytes);
            let result = with_deadline(
                self.request_timeout,
                cancel,
                self.detector.detect(&encoded),
                DetectionError::TimedOut,
                || DetectionError::Cancelled,
            )
            .await
            .map_err(|e| {
                error!("Object detection failed: {}", e);
                GatewayError::DetectionFailed(e)
            })?;

            info!("Detection returned {} objects", result.detections.len());
            Ok(vec![result])
        }
        .instrument(span)
        .await
    }

    /// Translate labels into the requested language, index-aligned with the input
    pub async fn handle_translate(
        &self,
        request: TranslationRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, GatewayError> {
        let span = info_span!(
            "translate",
            request_id = %Uuid::new_v4(),
            lang = %request.target_language,
            labels = request.labels.len()
        );
        async move {
            let target_language = request.target_language.trim();
            if target_language.is_empty() {
                warn!("Translate request without a target language");
                return Err(GatewayError::InvalidRequest("lang is empty".to_string()));
            }

            let outcomes = with_deadline(
                self.request_timeout,
                cancel,
                self.translator.translate(&request.labels, target_language, cancel),
                TranslationError::TimedOut,
                || TranslationError::Cancelled,
            )
            .await
            .map_err(|e| {
                error!("Translation failed: {}", e);
                GatewayError::TranslationFailed(e)
            })?;

            let fallbacks = outcomes.iter().filter(|o| o.is_fallback()).count();
            info!(
                "Translated {} labels ({} kept untranslated)",
                outcomes.len(),
                fallbacks
            );

            Ok(outcomes.into_iter().map(|o| o.into_text()).collect())
        }
        .instrument(span)
        .await
    }

    pub async fn detection_healthy(&self) -> bool {
        self.detector.health_check().await
    }
}

/// Race `call` against the deadline and the cancellation token
async fn with_deadline<T, E, F>(
    deadline: Duration,
    cancel: &CancellationToken,
    call: F,
    timed_out: impl FnOnce(Duration) -> E,
    cancelled: impl FnOnce() -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(cancelled()),
        result = tokio::time::timeout(deadline, call) => match result {
            Ok(inner) => inner,
            Err(_) => Err(timed_out(deadline)),
        },
    }
}

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::interface::{LabelTranslation, TranslationProvider};
use crate::errors::TranslationError;

/// Translates label batches one provider call per label.
///
/// Calls run concurrently up to `max_concurrent`, but results always come back
/// in input order. A label with no candidates falls back to itself; any
/// provider error fails the whole batch.
#[derive(Clone)]
pub struct TranslationClient {
    provider: Arc<dyn TranslationProvider>,
    max_concurrent: usize,
}

impl TranslationClient {
    pub fn new(provider: Arc<dyn TranslationProvider>, max_concurrent: usize) -> Self {
        Self {
            provider,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn translate(
        &self,
        labels: &[String],
        target_language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<LabelTranslation>, TranslationError> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        // Futures are built up front so the stream owns them outright
        let calls: Vec<_> = labels
            .iter()
            .enumerate()
            .map(|(index, label)| self.translate_one(index, label, target_language))
            .collect();
        let batch = stream::iter(calls)
            .buffered(self.max_concurrent)
            .try_collect::<Vec<_>>();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Translation batch of {} labels cancelled", labels.len());
                Err(TranslationError::Cancelled)
            }
            result = batch => result,
        }
    }

    /// Same as [`translate`](Self::translate), collapsed to plain text
    pub async fn translate_text(
        &self,
        labels: &[String],
        target_language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, TranslationError> {
        let outcomes = self.translate(labels, target_language, cancel).await?;
        Ok(outcomes.into_iter().map(LabelTranslation::into_text).collect())
    }

    async fn translate_one(
        &self,
        index: usize,
        label: &str,
        target_language: &str,
    ) -> Result<LabelTranslation, TranslationError> {
        let candidates = self
            .provider
            .translate(label, target_language)
            .await
            .map_err(|e| {
                warn!("Translating label #{} ({:?}) failed: {}", index, label, e);
                e
            })?;

        match candidates.into_iter().next() {
            Some(text) => Ok(LabelTranslation::Translated(text)),
            None => {
                debug!("No candidates for label #{} ({:?}), keeping original", index, label);
                Ok(LabelTranslation::Fallback(label.to_string()))
            }
        }
    }
}

//! Translate interface - actual implementation is the external provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::TranslationError;

/// Body of `POST /translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Labels to translate, in display order
    #[serde(rename = "detections")]
    pub labels: Vec<String>,
    #[serde(rename = "lang")]
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub translations: Vec<String>,
}

/// Outcome for a single label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelTranslation {
    /// First candidate returned by the provider
    Translated(String),
    /// Provider returned no candidates; holds the original label
    Fallback(String),
}

impl LabelTranslation {
    pub fn is_fallback(&self) -> bool {
        matches!(self, LabelTranslation::Fallback(_))
    }

    pub fn into_text(self) -> String {
        match self {
            LabelTranslation::Translated(text) | LabelTranslation::Fallback(text) => text,
        }
    }
}

/// A text translation provider. Source language is auto-detected.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate one text into `target_language`.
    ///
    /// Returns zero or more candidates. An empty list is not an error; transport,
    /// auth and protocol failures are.
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError>;
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::DetectionError;

/// One labeled bounding box reported by the detection backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    pub confidence: f64,
    /// x1, y1, x2, y2
    #[serde(rename = "box")]
    pub bbox: [i32; 4],
}

/// Detection backend response for one uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub annotated_image: Option<String>,
}

/// Request body sent to the detection backend
#[derive(Debug, Serialize)]
pub struct DetectionRequest<'a> {
    pub image: &'a str,
}

/// Detection interface trait - actual implementation is the external backend
#[async_trait]
pub trait DetectionInterface: Send + Sync {
    /// Run detection on a base64-encoded image.
    ///
    /// The input is forwarded as-is; judging whether it is a valid image is
    /// left to the backend.
    async fn detect(&self, encoded_image: &str) -> Result<DetectionResult, DetectionError>;

    /// Whether the backend answers its health endpoint
    async fn health_check(&self) -> bool;
}

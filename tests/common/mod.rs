//! Shared helpers for the integration tests: in-process fake collaborators
//! served by axum on an ephemeral local port.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use base64::{engine::general_purpose::STANDARD, Engine};
use image_detect_gateway::{translate::TranslationProvider, Config, TranslationError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 10x10 all-black RGB PNG
pub const BLACK_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAoAAAAKCAIAAAACUFjqAAAADUlEQVR4nGNgGAWkAwABNgABVtF/yAAAAABJRU5ErkJggg==";

pub const BOUNDARY: &str = "X-GATEWAY-TEST-BOUNDARY";

pub fn black_png() -> Vec<u8> {
    STANDARD.decode(BLACK_PNG_BASE64).unwrap()
}

/// Serve `router` on 127.0.0.1 and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A local URL with nothing listening on it
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn config_with_backend(base_url: &str) -> Config {
    let mut config = Config::default();
    config.detection_config.base_url = base_url.to_string();
    config.detection_config.timeout_secs = 5;
    config.detection_config.connect_timeout_secs = 2;
    config.system_config.request_timeout_secs = 5;
    config
}

/// A multipart body with one file field
pub fn multipart_request(field: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A multipart body with one plain text field (no filename)
pub fn multipart_text_request(field: &str, value: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{b}--\r\n",
        b = BOUNDARY,
        field = field,
        value = value
    );

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Translation provider answering from a table; labels not in the table fail hard
pub struct ScriptedProvider {
    answers: HashMap<String, Vec<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(answers: &[(&str, Vec<&str>)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    async fn translate(
        &self,
        text: &str,
        _target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(text)
            .cloned()
            .ok_or_else(|| TranslationError::Auth(format!("quota exhausted while translating {}", text)))
    }
}

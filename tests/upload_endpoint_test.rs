//! `/upload` tests: router -> gateway -> real detection client -> fake backend

mod common;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use image_detect_gateway::{detection::DetectionClient, routes::create_app, AppState};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::util::ServiceExt;

use common::*;

#[derive(Clone)]
struct BackendState {
    calls: Arc<AtomicUsize>,
    last_image: Arc<Mutex<Option<String>>>,
    reply: Arc<(StatusCode, String)>,
}

async fn fake_detect(State(state): State<BackendState>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_image.lock().unwrap() = body["image"].as_str().map(str::to_string);
    let (status, reply) = state.reply.as_ref();
    (*status, reply.clone())
}

/// Spawn a fake backend answering every `/detect` call with `reply`
async fn spawn_backend(status: StatusCode, reply: &str) -> (String, BackendState) {
    let state = BackendState {
        calls: Arc::new(AtomicUsize::new(0)),
        last_image: Arc::new(Mutex::new(None)),
        reply: Arc::new((status, reply.to_string())),
    };
    let router = Router::new()
        .route("/detect", post(fake_detect))
        .with_state(state.clone());
    (spawn_server(router).await, state)
}

fn app_for(base_url: &str) -> Router {
    let config = config_with_backend(base_url);
    let detector = Arc::new(DetectionClient::new(&config.detection_config).unwrap());
    let provider = Arc::new(ScriptedProvider::new(&[]));
    create_app(AppState::with_collaborators(config, detector, provider))
}

#[tokio::test]
async fn black_png_detections_are_returned_unchanged() {
    let backend_reply = r#"{"detections":[{"class":"cat","confidence":0.92,"box":[1,1,5,5]}],"annotated_image":"<ignored>"}"#;
    let (url, backend) = spawn_backend(StatusCode::OK, backend_reply).await;

    let png = black_png();
    let response = app_for(&url)
        .oneshot(multipart_request("image", "black.png", &png))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!([{
            "detections": [{"class": "cat", "confidence": 0.92, "box": [1, 1, 5, 5]}],
            "annotated_image": "<ignored>"
        }])
    );

    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        backend.last_image.lock().unwrap().as_deref(),
        Some(BLACK_PNG_BASE64)
    );
}

#[tokio::test]
async fn missing_image_field_is_400_and_backend_is_not_called() {
    let (url, backend) = spawn_backend(StatusCode::OK, r#"{"detections":[]}"#).await;

    let response = app_for(&url)
        .oneshot(multipart_request("photo", "black.png", &black_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Image upload failed"}));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn text_part_named_image_is_not_a_file() {
    let (url, backend) = spawn_backend(StatusCode::OK, r#"{"detections":[]}"#).await;

    let response = app_for(&url)
        .oneshot(multipart_text_request("image", "hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Image upload failed"}));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_file_is_forwarded_to_backend() {
    let (url, backend) = spawn_backend(StatusCode::OK, r#"{"detections":[]}"#).await;

    let response = app_for(&url)
        .oneshot(multipart_request("image", "empty.png", &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.last_image.lock().unwrap().as_deref(), Some(""));
}

#[tokio::test]
async fn non_multipart_body_is_400() {
    let (url, backend) = spawn_backend(StatusCode::OK, r#"{"detections":[]}"#).await;

    let response = app_for(&url)
        .oneshot(json_request("/upload", r#"{"image": "abc"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Image upload failed"}));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_backend_is_500() {
    let url = unreachable_url().await;

    let response = app_for(&url)
        .oneshot(multipart_request("image", "black.png", &black_png()))
        .await
        .unwrap();

    assert!(response.status().is_server_error());
    assert_eq!(body_json(response).await, json!({"error": "Object detection failed"}));
}

#[tokio::test]
async fn unparseable_backend_reply_is_500() {
    let (url, backend) = spawn_backend(StatusCode::OK, "<html>Internal Server Error</html>").await;

    let response = app_for(&url)
        .oneshot(multipart_request("image", "black.png", &black_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body, json!({"error": "Object detection failed"}));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn backend_error_status_is_500() {
    let (url, _backend) =
        spawn_backend(StatusCode::BAD_GATEWAY, r#"{"detections":[]}"#).await;

    let response = app_for(&url)
        .oneshot(multipart_request("image", "black.png", &black_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn zero_detections_is_a_valid_result() {
    let (url, _backend) =
        spawn_backend(StatusCode::OK, r#"{"detections":[],"annotated_image":"https://cdn/x.jpg"}"#).await;

    let response = app_for(&url)
        .oneshot(multipart_request("image", "black.png", &black_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([{"detections": [], "annotated_image": "https://cdn/x.jpg"}])
    );
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let (url, backend) = spawn_backend(StatusCode::OK, r#"{"detections":[]}"#).await;
    let mut config = config_with_backend(&url);
    config.system_config.max_upload_bytes = 1024;
    let detector = Arc::new(DetectionClient::new(&config.detection_config).unwrap());
    let app = create_app(AppState::with_collaborators(
        config,
        detector,
        Arc::new(ScriptedProvider::new(&[])),
    ));

    let response = app
        .oneshot(multipart_request("image", "big.png", &vec![0u8; 64 * 1024]))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_reports_backend_status() {
    let backend = Router::new().route("/health", axum::routing::get(|| async { "ok" }));
    let url = spawn_server(backend).await;

    let response = app_for(&url)
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "ok", "detection_service": true})
    );

    let response = app_for(&unreachable_url().await)
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["detection_service"], false);
}

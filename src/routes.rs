use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::detection::DetectionResult;
use crate::errors::GatewayError;
use crate::gateway::Upload;
use crate::state::AppState;
use crate::translate::{TranslationRequest, TranslationResponse};

/// Multipart field carrying the uploaded image
pub const IMAGE_FIELD: &str = "image";

pub fn create_routes(state: AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // Gateway operations
        .route(
            "/upload",
            post(upload_image).layer(DefaultBodyLimit::max(system_config.max_upload_bytes)),
        )
        .route("/translate", post(translate_labels))

        // Static file serving
        .route_service("/", ServeFile::new(system_config.index_path()))
        .nest_service("/static", ServeDir::new(system_config.static_path()))
}

/// Full application with middleware, ready to serve
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let detection_healthy = state.gateway.detection_healthy().await;
    Json(json!({
        "status": "ok",
        "detection_service": detection_healthy
    }))
}

async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<DetectionResult>>, GatewayError> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Upload rejected, not a multipart body: {}", e);
        GatewayError::InvalidUpload(format!("not a multipart body: {}", e))
    })?;
    let upload = read_image_field(&mut multipart).await?;

    let cancel = state.request_token();
    let results = state.gateway.handle_detect(upload, &cancel).await?;
    Ok(Json(results))
}

/// Find the `image` file part; other fields, and plain text parts named
/// `image`, are skipped
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<Upload>, GatewayError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Upload rejected, malformed multipart body: {}", e);
        GatewayError::InvalidUpload(format!("multipart error: {}", e))
    })? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            warn!("Multipart field {:?} is not a file, skipping", IMAGE_FIELD);
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            warn!("Reading upload {:?} failed: {}", file_name, e);
            GatewayError::InvalidUpload(format!("read error: {}", e))
        })?;

        return Ok(Some(Upload {
            file_name: Some(file_name),
            content_type,
            bytes,
        }));
    }

    Ok(None)
}

async fn translate_labels(
    State(state): State<AppState>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResponse>, GatewayError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Translate request rejected: {}", e.body_text());
        GatewayError::InvalidRequest(e.body_text())
    })?;

    let cancel = state.request_token();
    let translations = state.gateway.handle_translate(request, &cancel).await?;
    Ok(Json(TranslationResponse { translations }))
}

//! HTTP API for site content and image uploads.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::infrastructure::file_names::{
    content_type_for, derive_upload_name, is_image_mime, sanitize_file_name,
};
use crate::infrastructure::{JsonFileContentStore, UploadDirectory};
use crate::port::{ContentStore, ImageStore};
use axum::{
    extract::{multipart::Field, rejection::JsonRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

/// Sections a content document must carry to be stored.
const REQUIRED_SECTIONS: [&str; 3] = ["hero", "partners", "projects"];

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub content: Arc<dyn ContentStore>,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// File-backed stores at the configured locations.
    pub fn from_config(config: ServerConfig) -> Self {
        Self {
            content: Arc::new(JsonFileContentStore::new(config.content_file.clone())),
            images: Arc::new(UploadDirectory::new(config.uploads_dir.clone())),
            config,
        }
    }
}

/// Any origin may call the API; preflights are answered before routing.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(3600))
}

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let uploads_route = format!(
        "{}/{{*path}}",
        state.config.public_prefix.trim_end_matches('/')
    );

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/content", get(get_content).post(save_content))
        .route("/api/upload", post(upload_image))
        .route("/api/upload-base64", post(upload_base64))
        .route(&uploads_route, get(serve_upload))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors_layer())
        .with_state(state)
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SaveContentResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Base64UploadRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn get_content(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ServerError> {
    match state.content.load().await {
        Ok(document) => Ok(Json(document)),
        Err(e) => {
            tracing::error!("Error loading content: {e:#}");
            Err(ServerError::Internal("Failed to load content".to_string()))
        }
    }
}

fn has_required_sections(document: &Value) -> bool {
    REQUIRED_SECTIONS
        .iter()
        .all(|section| document.get(section).is_some_and(|v| !v.is_null()))
}

async fn save_content(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveContentResponse>, ServerError> {
    let Json(document) = payload.map_err(|e| ServerError::bad_request(e.body_text()))?;

    if !has_required_sections(&document) {
        return Err(ServerError::bad_request("Invalid content structure"));
    }

    if let Err(e) = state.content.save(&document).await {
        tracing::error!("Error saving content: {e:#}");
        return Err(ServerError::Internal("Failed to save content".to_string()));
    }

    tracing::info!("Content saved successfully");
    Ok(Json(SaveContentResponse {
        success: true,
        message: "Content saved successfully".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

struct UploadedFile {
    original_name: Option<String>,
    bytes: Vec<u8>,
}

/// Reads a multipart field into memory, failing once it exceeds `max_bytes`.
async fn read_limited(field: &mut Field<'_>, max_bytes: usize) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ServerError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if buf.len().saturating_add(chunk.len()) > max_bytes {
            return Err(ServerError::bad_request(format!(
                "File too large (max {} bytes)",
                max_bytes
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    let mut file = None;
    let mut requested_name = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let mime = field.content_type().unwrap_or_default().to_string();
                if !is_image_mime(&mime) {
                    return Err(ServerError::bad_request("Only image files are allowed"));
                }
                let original_name = field.file_name().map(str::to_string);
                let bytes = read_limited(&mut field, state.config.max_upload_bytes).await?;
                file = Some(UploadedFile {
                    original_name,
                    bytes,
                });
            }
            "fileName" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::bad_request(format!("Invalid fileName field: {e}")))?;
                requested_name = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ServerError::bad_request("No file uploaded"))?;
    let file_name = match requested_name {
        Some(requested) => sanitize_file_name(&requested)
            .ok_or_else(|| ServerError::bad_request("Invalid file name"))?,
        None => derive_upload_name(
            file.original_name.as_deref(),
            Utc::now().timestamp_millis(),
        ),
    };

    store_image(&state, &file_name, &file.bytes).await?;

    Ok(Json(UploadResponse {
        success: true,
        path: state.config.public_path(&file_name),
        file_name: Some(file_name),
        message: "Image uploaded successfully".to_string(),
    }))
}

/// Decodes a `data:<mime>;base64,<payload>` URL or bare base64.
fn decode_image_data(data: &str) -> Result<Vec<u8>, ServerError> {
    let payload = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest
                .split_once(',')
                .ok_or_else(|| ServerError::bad_request("Invalid data URL"))?;
            let mime = header.split(';').next().unwrap_or_default();
            if !is_image_mime(mime) {
                return Err(ServerError::bad_request("Only image files are allowed"));
            }
            body
        }
        None => data,
    };

    BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| ServerError::bad_request(format!("Invalid base64 data: {e}")))
}

async fn upload_base64(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Base64UploadRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, ServerError> {
    let Json(req) = payload.map_err(|e| ServerError::bad_request(e.body_text()))?;

    let (Some(filename), Some(data)) = (
        req.filename.filter(|f| !f.trim().is_empty()),
        req.data.filter(|d| !d.trim().is_empty()),
    ) else {
        return Err(ServerError::bad_request("Filename and data are required"));
    };

    let file_name =
        sanitize_file_name(&filename).ok_or_else(|| ServerError::bad_request("Invalid file name"))?;
    let bytes = decode_image_data(&data)?;
    if bytes.is_empty() {
        return Err(ServerError::bad_request("Empty file uploaded"));
    }

    store_image(&state, &file_name, &bytes).await?;

    Ok(Json(UploadResponse {
        success: true,
        path: state.config.public_path(&file_name),
        file_name: None,
        message: "Image uploaded successfully".to_string(),
    }))
}

async fn store_image(state: &AppState, file_name: &str, bytes: &[u8]) -> Result<(), ServerError> {
    if let Err(e) = state.images.put(file_name, bytes).await {
        tracing::error!("Error uploading image: {e:#}");
        return Err(ServerError::Internal("Failed to upload image".to_string()));
    }
    tracing::info!(file_name, size = bytes.len(), "Image uploaded");
    Ok(())
}

async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ServerError> {
    match state.images.get(&path).await {
        Ok(Some(bytes)) => {
            Ok(([(header::CONTENT_TYPE, content_type_for(&path))], bytes).into_response())
        }
        Ok(None) => Err(ServerError::NotFound("File not found".to_string())),
        Err(e) => {
            tracing::error!("Error reading upload {path}: {e:#}");
            Err(ServerError::Internal("Failed to read file".to_string()))
        }
    }
}

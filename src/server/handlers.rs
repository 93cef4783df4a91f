//! HTTP request handlers.
//!
//! # Endpoints
//!
//! - `GET /{*path}` - Serve a rendered tile or a static file
//! - `GET /` - Serve `index.html`
//! - `GET /health` - Health check endpoint
//! - `POST /api/fullPathName` - Acquisition output directory
//! - `POST /api/requiredStorage` - Acquisition storage estimate

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::acquisition::{
    full_output_path, required_storage, FullPathRequest, FullPathResponse,
    RequiredStorageRequest, RequiredStorageResponse,
};
use crate::error::{ApiError, IoError, TileError};
use crate::io::{content_type_for, FileSource};
use crate::tile::{RenderRequest, TileService};

/// Content type of rendered tiles.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Response header reporting whether a tile came from the cache.
pub const TILE_CACHE_HIT_HEADER: &str = "x-tile-cache-hit";

/// File served for `GET /`.
pub const INDEX_FILE: &str = "index.html";

/// Message returned in place of internal error detail.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor. The tile
/// service owns the tile cache, so every handler sees the same cache.
pub struct AppState<S: FileSource> {
    /// The tile service for rendering tile requests
    pub tile_service: Arc<TileService<S>>,

    /// Cache-Control max-age for tiles, in seconds
    pub cache_max_age: u32,
}

impl<S: FileSource + 'static> AppState<S> {
    /// Create a new application state with the given tile service.
    pub fn new(tile_service: TileService<S>) -> Self {
        Self::with_cache_max_age(tile_service, super::routes::DEFAULT_CACHE_MAX_AGE)
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(tile_service: TileService<S>, cache_max_age: u32) -> Self {
        Self {
            tile_service: Arc::new(tile_service),
            cache_max_age,
        }
    }

    /// The source that tiles and static files are read from.
    pub fn source(&self) -> &Arc<S> {
        self.tile_service.source()
    }
}

impl<S: FileSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            tile_service: Arc::clone(&self.tile_service),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "bad_request")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Number of tiles currently cached
    pub cached_tiles: usize,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Log an error according to its status and build the JSON response.
///
/// Server errors are logged at ERROR with the full detail, and the client
/// only sees a generic message. 404s are logged at DEBUG, other client
/// errors at WARN.
fn error_response(status: StatusCode, error_type: &str, message: String) -> Response {
    let message = if status.is_server_error() {
        error!(
            error_type = error_type,
            status = status.as_u16(),
            "Server error: {}",
            message
        );
        INTERNAL_ERROR_MESSAGE.to_string()
    } else {
        if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }
        message
    };

    let error_response = ErrorResponse::with_status(error_type, message, status);

    (status, Json(error_response)).into_response()
}

/// Convert TileError to HTTP response.
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            TileError::SourceNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            TileError::InvalidPath { .. } => (StatusCode::BAD_REQUEST, "invalid_path"),
            TileError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            TileError::DecodeError { .. } | TileError::UnsupportedPixelFormat { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "decode_error")
            }
            TileError::EncodeError { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "encode_error"),
            TileError::RenderTask { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "render_error"),
        };

        error_response(status, error_type, self.to_string())
    }
}

/// Convert IoError (static file reads) to HTTP response.
impl IntoResponse for IoError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            IoError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            IoError::InvalidPath(_) => (StatusCode::BAD_REQUEST, "invalid_path"),
            IoError::Read { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
        };

        error_response(status, error_type, self.to_string())
    }
}

/// Convert ApiError to HTTP response.
///
/// Every acquisition API error is a problem with the request.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_type = match &self {
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::UnsupportedPixelDepth { .. } => "unsupported_pixel_depth",
            ApiError::StorageOverflow => "storage_overflow",
        };

        error_response(StatusCode::BAD_REQUEST, error_type, self.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Error from the file handler: either a tile or a static file failed.
#[derive(Debug)]
pub enum HandlerError {
    Tile(TileError),
    Static(IoError),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::Tile(err) => err.into_response(),
            HandlerError::Static(err) => err.into_response(),
        }
    }
}

impl From<TileError> for HandlerError {
    fn from(err: TileError) -> Self {
        HandlerError::Tile(err)
    }
}

impl From<IoError> for HandlerError {
    fn from(err: IoError) -> Self {
        HandlerError::Static(err)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle file requests.
///
/// # Endpoint
///
/// `GET /{*path}`
///
/// If `path`, with modifier segments stripped, ends in `.png`, `.tif` or
/// `.tiff`, a tile is rendered (or served from cache). Any other path is
/// served as a static file.
///
/// # Response
///
/// - `200 OK`: PNG tile, or the file bytes with a content type guessed from
///   the extension
/// - `400 Bad Request`: Path escapes the served root
/// - `404 Not Found`: Source image or file does not exist
/// - `500 Internal Server Error`: Source could not be read or rendered
///
/// # Tile Headers
///
/// - `Content-Type: image/png`
/// - `Cache-Control: public, max-age={cache_max_age}`
/// - `X-Tile-Cache-Hit: true|false`
pub async fn file_handler<S: FileSource + 'static>(
    State(state): State<AppState<S>>,
    Path(path): Path<String>,
) -> Result<Response, HandlerError> {
    serve_path(&state, &path).await
}

/// Handle `GET /` by serving the index page.
pub async fn index_handler<S: FileSource + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Response, HandlerError> {
    serve_path(&state, INDEX_FILE).await
}

async fn serve_path<S: FileSource + 'static>(
    state: &AppState<S>,
    path: &str,
) -> Result<Response, HandlerError> {
    match RenderRequest::parse(path) {
        Some(request) => {
            let response = state.tile_service.get_tile(path, request).await?;

            let headers = [
                (header::CONTENT_TYPE, PNG_CONTENT_TYPE.to_string()),
                (
                    header::CACHE_CONTROL,
                    format!("public, max-age={}", state.cache_max_age),
                ),
                (
                    HeaderName::from_static(TILE_CACHE_HIT_HEADER),
                    response.cache_hit.to_string(),
                ),
            ];

            Ok((StatusCode::OK, headers, Body::from(response.data)).into_response())
        }
        None => {
            let data = state.source().read(path).await?;

            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type_for(path))],
                Body::from(data),
            )
                .into_response())
        }
    }
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "cached_tiles": 12
/// }
/// ```
pub async fn health_handler<S: FileSource + 'static>(
    State(state): State<AppState<S>>,
) -> Json<HealthResponse> {
    let (cached_tiles, _) = state.tile_service.cache_stats().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached_tiles,
    })
}

/// Handle acquisition output path requests.
///
/// # Endpoint
///
/// `POST /api/fullPathName`
///
/// Body: `{"base_path": "...", "project_name": "...", "plate_name": "..."}`
///
/// # Response
///
/// - `200 OK`: `{"full_output_path": "<base_path>/<project_name>/<plate_name>"}`
/// - `400 Bad Request`: Body is not valid JSON of that shape
pub async fn full_path_name_handler(
    payload: Result<Json<FullPathRequest>, JsonRejection>,
) -> Result<Json<FullPathResponse>, ApiError> {
    let Json(request) = payload?;

    Ok(Json(FullPathResponse {
        full_output_path: full_output_path(&request),
    }))
}

/// Handle acquisition storage estimate requests.
///
/// # Endpoint
///
/// `POST /api/requiredStorage`
///
/// Body:
/// ```json
/// {
///   "pixel_depth": {"handle": "mono8"},
///   "grid": {"num_x": 2, "num_y": 2, "num_z": 1, "num_t": 1},
///   "well_selection": [[true, false], [false, false]]
/// }
/// ```
///
/// # Response
///
/// - `200 OK`: `{"max_required_storage": 25000000}`
/// - `400 Bad Request`: Body is not valid JSON of that shape, the pixel
///   depth is not `mono8` or `mono12`, or the estimate overflows
pub async fn required_storage_handler(
    payload: Result<Json<RequiredStorageRequest>, JsonRejection>,
) -> Result<Json<RequiredStorageResponse>, ApiError> {
    let Json(request) = payload?;

    Ok(Json(RequiredStorageResponse {
        max_required_storage: required_storage(&request)?,
    }))
}

// =============================================================================
// Tests
// =============================================================================

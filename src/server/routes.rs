//! Router assembly.
//!
//! ```text
//! GET  /                       index.html from the served root
//! GET  /health                 liveness and tile cache size
//! POST /api/fullPathName       acquisition output directory
//! POST /api/requiredStorage    acquisition storage estimate
//! GET  /{*path}                rendered tile, or the file as-is
//! ```
//!
//! The API routes are matched before the catch-all, so a file named
//! `api/fullPathName` under the root is unreachable.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::handlers::{
    file_handler, full_path_name_handler, health_handler, index_handler,
    required_storage_handler, AppState,
};
use crate::io::FileSource;
use crate::tile::TileService;

/// Tile `Cache-Control: max-age`, in seconds, when not configured.
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

/// How long browsers may reuse a CORS preflight answer.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

// =============================================================================
// Router Configuration
// =============================================================================

/// HTTP-level settings that are independent of the tile source.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Origins allowed to call the server cross-origin; `None` allows any
    pub cors_origins: Option<Vec<String>>,

    /// `max-age` sent with every tile
    pub cache_max_age: u32,

    /// Wrap the router in a `TraceLayer`
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Any origin, one-hour tile max-age, tracing on.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            enable_tracing: true,
        }
    }

    /// Restrict CORS to `origins`. An empty list blocks every cross-origin
    /// caller.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Build the application router around a tile service.
///
/// The service's file source also backs static files and the index page,
/// so tiles and pages always come from the same root.
pub fn create_router<S>(tile_service: TileService<S>, config: RouterConfig) -> Router
where
    S: FileSource + 'static,
{
    let state = AppState::with_cache_max_age(tile_service, config.cache_max_age);

    let router = Router::new()
        .route("/", get(index_handler::<S>))
        .route("/health", get(health_handler::<S>))
        .route("/api/fullPathName", post(full_path_name_handler))
        .route("/api/requiredStorage", post(required_storage_handler))
        .route("/{*path}", get(file_handler::<S>))
        .with_state(state)
        .layer(cors_layer(config.cors_origins.as_deref()));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// CORS for the viewer: GET for tiles and files, POST for the JSON API.
fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(PREFLIGHT_MAX_AGE);

    let Some(origins) = origins else {
        return layer.allow_origin(Any);
    };

    // A wildcard cannot be mixed into an explicit origin list
    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

// =============================================================================
// Tests
// =============================================================================

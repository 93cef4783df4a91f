//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │      GET /{*path}          POST /api/{fullPathName,...}         │
//! │                                                                 │
//! │  ┌──────────────────────────────┐  ┌─────────────────────────┐  │
//! │  │          handlers            │  │        routes           │  │
//! │  │ (tiles, static, acquisition) │  │  (router, CORS, trace)  │  │
//! │  └──────────────────────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    file_handler, full_path_name_handler, health_handler, index_handler,
    required_storage_handler, AppState, ErrorResponse, HandlerError, HealthResponse,
    PNG_CONTENT_TYPE, TILE_CACHE_HIT_HEADER,
};
pub use routes::{create_router, RouterConfig, DEFAULT_CACHE_MAX_AGE};

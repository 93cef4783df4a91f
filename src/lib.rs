//! # Plate Server
//!
//! An HTTP server for microscopy plate images.
//!
//! Source images are 16-bit monochrome camera frames. Browsers cannot show
//! those directly, so the server renders them into 8-bit PNG tiles on
//! demand. Rendering parameters travel in the file name:
//!
//! ```text
//! GET /plate_1/A01_site1.tif.b1_5.lowres.saturated
//! ```
//!
//! renders `plate_1/A01_site1.tif` at one tenth of its resolution, 1.5×
//! brighter, with saturated pixels painted red.
//!
//! ## Architecture
//!
//! - [`tile`] - Path modifier decoding, the render pipeline, and the tile cache
//! - [`io`] - File sources (local filesystem)
//! - [`acquisition`] - Output path and storage estimate computations
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use plate_server::{create_router, LocalFileSource, RouterConfig, TileService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tile_service = TileService::new(LocalFileSource::new("/data/plates"));
//!     let router = create_router(tile_service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod acquisition;
pub mod config;
pub mod error;
pub mod io;
pub mod server;
pub mod tile;

// Re-export commonly used types
pub use acquisition::{
    full_output_path, required_storage, FullPathRequest, FullPathResponse, PixelDepth,
    RequiredStorageRequest, RequiredStorageResponse,
};
pub use config::Config;
pub use error::{ApiError, IoError, TileError};
pub use io::{content_type_for, FileSource, LocalFileSource};
pub use server::{create_router, AppState, ErrorResponse, HealthResponse, RouterConfig};
pub use tile::{
    render_tile, CachedTile, PngTileEncoder, RenderRequest, Resolution, TileCache, TileResponse,
    TileService,
};

//! Tile Service for orchestrating tile generation.
//!
//! The TileService is the main entry point for tile requests. It orchestrates:
//! - Cache lookups by raw request path
//! - Source image reads via the file source
//! - Rendering on the blocking thread pool
//! - Result caching
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileService                             │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                    get_tile()                           │    │
//! │  │  1. Check cache       3. Render (blocking pool)         │    │
//! │  │  2. Read source       4. Cache & return                 │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │           │                    │                    │           │
//! │           ▼                    ▼                    ▼           │
//! │    ┌───────────┐      ┌──────────────┐    ┌──────────────────┐  │
//! │    │ TileCache │      │  FileSource  │    │   render_tile    │  │
//! │    └───────────┘      └──────────────┘    └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::error::TileError;
use crate::io::FileSource;

use super::cache::TileCache;
use super::encoder::PngTileEncoder;
use super::modifiers::RenderRequest;
use super::render::render_tile;

// =============================================================================
// Tile Response
// =============================================================================

/// Response from the tile service.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// The encoded PNG tile data
    pub data: Bytes,

    /// Whether this tile was served from cache
    pub cache_hit: bool,
}

// =============================================================================
// Tile Service
// =============================================================================

/// Service for rendering and caching tiles.
///
/// # Type Parameters
///
/// * `S` - The file source the source images are read from
///
/// # Example
///
/// ```ignore
/// use plate_server::io::LocalFileSource;
/// use plate_server::tile::{RenderRequest, TileService};
///
/// let service = TileService::new(LocalFileSource::new("/data/plates"));
///
/// let raw_path = "plate_1/A01.tif.halfres.saturated";
/// let request = RenderRequest::parse(raw_path).unwrap();
/// let response = service.get_tile(raw_path, request).await?;
///
/// println!("Tile size: {} bytes, cache hit: {}", response.data.len(), response.cache_hit);
/// ```
pub struct TileService<S: FileSource> {
    /// Where source images are read from
    source: Arc<S>,

    /// Cache for rendered tiles
    cache: TileCache,

    /// PNG encoder
    encoder: PngTileEncoder,
}

impl<S: FileSource + 'static> TileService<S> {
    /// Create a new tile service with an unbounded cache.
    pub fn new(source: S) -> Self {
        Self::with_cache(source, TileCache::new())
    }

    /// Create a new tile service with the given cache.
    pub fn with_cache(source: S, cache: TileCache) -> Self {
        Self::with_shared_source(Arc::new(source), cache)
    }

    /// Create a new tile service around a shared source.
    ///
    /// This allows the static file handler and the tile service to read from
    /// the same source.
    pub fn with_shared_source(source: Arc<S>, cache: TileCache) -> Self {
        Self {
            source,
            cache,
            encoder: PngTileEncoder::new(),
        }
    }

    /// Get a tile, using the cache when available.
    ///
    /// `raw_path` is the full request path and is the cache key; `request`
    /// is its decoded form.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source image does not exist (`SourceNotFound`)
    /// - The source cannot be read, decoded, or the tile cannot be encoded
    ///
    /// Nothing is cached on error.
    pub async fn get_tile(
        &self,
        raw_path: &str,
        request: RenderRequest,
    ) -> Result<TileResponse, TileError> {
        if let Some(data) = self.cache.get(raw_path).await {
            debug!(raw_path, "Tile cache hit");
            return Ok(TileResponse {
                data,
                cache_hit: true,
            });
        }

        debug!(
            raw_path,
            source = %request.source_path,
            factor = request.downsample_factor(),
            brightness = request.brightness,
            highlight = request.highlight_saturated,
            "Tile cache miss, rendering"
        );

        let data = self.render(request).await?;

        self.cache.put(raw_path, data.clone()).await;

        Ok(TileResponse {
            data,
            cache_hit: false,
        })
    }

    /// Render a tile without touching the cache.
    ///
    /// The source is read asynchronously; decoding, the pixel pipeline and
    /// encoding run on the blocking pool.
    pub async fn render(&self, request: RenderRequest) -> Result<Bytes, TileError> {
        let source = self.source.read(&request.source_path).await?;
        let encoder = self.encoder;

        tokio::task::spawn_blocking(move || render_tile(&source, &request, &encoder))
            .await
            .map_err(|e| TileError::RenderTask {
                message: e.to_string(),
            })?
    }

    /// Get tile cache statistics.
    ///
    /// Returns `(entry_count, total_bytes)`.
    pub async fn cache_stats(&self) -> (usize, usize) {
        let count = self.cache.len().await;
        let size = self.cache.size().await;
        (count, size)
    }

    /// Get a reference to the tile cache.
    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    /// Get a reference to the underlying file source.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

// =============================================================================
// Tests
// =============================================================================

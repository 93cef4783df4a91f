//! Tile service layer.
//!
//! This module turns tile request paths into rendered PNG tiles and caches
//! the results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │  raw path + RenderRequest
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  TileCache   │  │  render_tile    │  │
//! │  │  (PNG bytes  │  │  (u16 → u8,     │  │
//! │  │  by raw path)│  │   subsample,    │  │
//! │  │              │  │   brightness,   │  │
//! │  │              │  │   highlight)    │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               FileSource                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`RenderRequest`]: Rendering parameters decoded from a request path
//! - [`TileService`]: Main entry point, orchestrates cache, source and render
//! - [`TileCache`]: Rendered tiles keyed by raw request path
//! - [`render_tile`]: The pixel pipeline, from source bytes to PNG bytes
//! - [`PngTileEncoder`]: Fast PNG encoding of rendered tiles

mod cache;
mod encoder;
pub mod modifiers;
pub mod render;
mod service;

pub use cache::{CachedTile, TileCache};
pub use encoder::{decode_mono16, Mono16Image, PngTileEncoder};
pub use modifiers::{
    is_mono_image_path, parse_brightness, RenderRequest, Resolution, DEFAULT_BRIGHTNESS,
    MONO_IMAGE_EXTENSIONS,
};
pub use render::{render_image, render_tile, HIGHLIGHT_COLOR};
pub use service::{TileResponse, TileService};

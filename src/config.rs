//! Configuration management.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `PLATE_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `PLATE_HOST` - Server bind address (default: 0.0.0.0)
//! - `PLATE_PORT` - Server port (default: 8000)
//! - `PLATE_ROOT` - Directory served, tiles and static files (default: .)
//! - `PLATE_CACHE_MAX_ENTRIES` - Tile cache entry limit (default: unbounded)
//! - `PLATE_CACHE_MAX_AGE` - HTTP cache max-age seconds for tiles (default: 3600)
//! - `PLATE_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use crate::server::DEFAULT_CACHE_MAX_AGE;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default served directory.
pub const DEFAULT_ROOT: &str = ".";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Plate Server - serves microscopy plate images as on-demand PNG tiles.
///
/// Requests for `.png`/`.tif`/`.tiff` files are rendered from 16-bit
/// monochrome sources; the suffixes `.saturated`, `.b<d>_<d>` and
/// `.highres|.halfres|.midres|.lowres` control the rendering. All other
/// files under the root are served as-is.
#[derive(Parser, Debug, Clone)]
#[command(name = "plate-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "PLATE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PLATE_PORT")]
    pub port: u16,

    /// Directory containing source images and static files.
    #[arg(long, default_value = DEFAULT_ROOT, env = "PLATE_ROOT")]
    pub root: PathBuf,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Maximum number of rendered tiles to keep (least recently used are
    /// evicted).
    ///
    /// If not specified, the tile cache is unbounded: tiles are kept for the
    /// life of the process and never re-rendered, even if the source changes.
    #[arg(long, env = "PLATE_CACHE_MAX_ENTRIES")]
    pub cache_max_entries: Option<usize>,

    /// HTTP Cache-Control max-age in seconds for tiles.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "PLATE_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "PLATE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        if !self.root.is_dir() {
            return Err(format!(
                "root '{}' is not a directory. Set --root or PLATE_ROOT",
                self.root.display()
            ));
        }

        if self.cache_max_entries == Some(0) {
            return Err(
                "cache_max_entries must be greater than 0 (omit it for an unbounded cache)"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the tile cache entry limit, `None` meaning unbounded.
    pub fn cache_limit(&self) -> Option<NonZeroUsize> {
        self.cache_max_entries.and_then(NonZeroUsize::new)
    }
}

// =============================================================================
// Tests
// =============================================================================

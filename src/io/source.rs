use async_trait::async_trait;
use bytes::Bytes;

use crate::error::IoError;

/// Trait for reading whole files out of the served directory tree.
///
/// Paths are always relative to the source root and use `/` as separator.
/// This abstraction lets the tile service and the static file handler work
/// against the local filesystem in production and an in-memory map in tests.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Read the complete contents of the file at `path`.
    ///
    /// Returns `IoError::NotFound` if the path does not name a regular file,
    /// and `IoError::InvalidPath` if it would escape the source root.
    async fn read(&self, path: &str) -> Result<Bytes, IoError>;

    /// Get a human-readable identifier for this source (for logging).
    fn identifier(&self) -> &str;
}

// =============================================================================
// Content Types
// =============================================================================

/// Known extensions for static files, with their content types.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("txt", "text/plain; charset=utf-8"),
    ("csv", "text/csv; charset=utf-8"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("ico", "image/x-icon"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("wasm", "application/wasm"),
    ("pdf", "application/pdf"),
];

/// Fallback for extensions not in the table.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Guess the content type of a file from its extension (case-insensitive).
pub fn content_type_for(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return DEFAULT_CONTENT_TYPE;
    };
    let ext = ext.to_ascii_lowercase();

    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

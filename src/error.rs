use thiserror::Error;

/// I/O errors that can occur when reading from the served directory tree
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// File does not exist (or is not a regular file)
    #[error("File not found: {0}")]
    NotFound(String),

    /// Path would escape the served root (absolute path or `..` component)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Underlying filesystem error
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

/// Errors that can occur while producing a tile
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Source image named by the request (after stripping modifiers) is absent
    #[error("Source image not found: {path}")]
    SourceNotFound { path: String },

    /// Request path is not allowed to be served
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// I/O error while reading the source image
    #[error("I/O error: {0}")]
    Io(IoError),

    /// Source bytes could not be decoded as an image
    #[error("Failed to decode source image: {message}")]
    DecodeError { message: String },

    /// Source decoded, but is not a 16-bit grayscale image
    #[error("Unsupported pixel format: expected 16-bit grayscale, got {found}")]
    UnsupportedPixelFormat { found: String },

    /// PNG encoding failed
    #[error("Failed to encode tile: {message}")]
    EncodeError { message: String },

    /// The blocking render task panicked or was cancelled
    #[error("Render task failed: {message}")]
    RenderTask { message: String },
}

impl From<IoError> for TileError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::NotFound(path) => TileError::SourceNotFound { path },
            IoError::InvalidPath(path) => TileError::InvalidPath { path },
            other => TileError::Io(other),
        }
    }
}

/// Errors from the acquisition JSON endpoints
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Body is missing, not JSON, or does not match the expected shape
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Pixel depth handle is not one of the supported camera formats
    #[error("Unsupported pixel depth: {handle} (expected mono8 or mono12)")]
    UnsupportedPixelDepth { handle: String },

    /// The storage estimate does not fit in 64 bits
    #[error("Required storage overflows: the requested acquisition is too large")]
    StorageOverflow,
}

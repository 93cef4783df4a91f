//! Source decoding and PNG tile encoding.
//!
//! # Design Decisions
//!
//! - **16-bit grayscale only**: sources are camera frames stored as 16-bit
//!   monochrome PNG or TIFF. Anything else is rejected rather than converted,
//!   since a silent conversion would change the meaning of the `>> 8` step.
//!
//! - **Fast compression**: tiles are rendered on demand and then cached, so
//!   encode latency matters more than output size. The encoder uses the
//!   fastest deflate setting and no row filtering.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageBuffer, ImageEncoder, ImageReader, Luma};

use crate::error::TileError;

/// A decoded 16-bit monochrome source image.
pub type Mono16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

// =============================================================================
// Source Decoding
// =============================================================================

/// Decode a 16-bit monochrome source image.
///
/// The container format (PNG or TIFF) is detected from the data.
///
/// # Errors
///
/// - `DecodeError` if the data is not a decodable image
/// - `UnsupportedPixelFormat` if it decodes to anything other than 16-bit gray
pub fn decode_mono16(source: &[u8]) -> Result<Mono16Image, TileError> {
    let reader = ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(|e| TileError::DecodeError {
            message: e.to_string(),
        })?;

    let img = reader.decode().map_err(|e| TileError::DecodeError {
        message: e.to_string(),
    })?;

    match img {
        DynamicImage::ImageLuma16(buffer) => Ok(buffer),
        other => Err(TileError::UnsupportedPixelFormat {
            found: format!("{:?}", other.color()),
        }),
    }
}

// =============================================================================
// PNG Encoder
// =============================================================================

/// PNG encoder for rendered tiles.
///
/// # Example
///
/// ```
/// use image::GrayImage;
/// use plate_server::tile::PngTileEncoder;
///
/// let encoder = PngTileEncoder::new();
/// let tile = GrayImage::new(4, 4);
/// let png = encoder.encode(&tile.into()).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PngTileEncoder {
    compression: CompressionType,
    filter: FilterType,
}

impl PngTileEncoder {
    /// Create an encoder tuned for speed.
    pub fn new() -> Self {
        Self {
            compression: CompressionType::Fast,
            filter: FilterType::NoFilter,
        }
    }

    /// Create an encoder with explicit deflate and filter settings.
    pub fn with_settings(compression: CompressionType, filter: FilterType) -> Self {
        Self {
            compression,
            filter,
        }
    }

    /// Encode a rendered tile as PNG.
    ///
    /// Accepts 8-bit grayscale and 8-bit RGBA images, the two layouts the
    /// render pipeline produces.
    pub fn encode(&self, img: &DynamicImage) -> Result<Bytes, TileError> {
        let color = match img {
            DynamicImage::ImageLuma8(_) => ExtendedColorType::L8,
            DynamicImage::ImageRgba8(_) => ExtendedColorType::Rgba8,
            other => {
                return Err(TileError::EncodeError {
                    message: format!("unexpected tile layout {:?}", other.color()),
                })
            }
        };

        let mut output = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut output, self.compression, self.filter);

        encoder
            .write_image(img.as_bytes(), img.width(), img.height(), color)
            .map_err(|e| TileError::EncodeError {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }
}

impl Default for PngTileEncoder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

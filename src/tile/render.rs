//! Tile render pipeline.
//!
//! Turns a 16-bit monochrome source into a browser-displayable PNG:
//!
//! ```text
//! decode u16 ─► subsample ─► >> 8 ─► × brightness, clip ─► [highlight] ─► PNG
//! ```
//!
//! Subsampling is nearest-neighbour: every `factor`-th row and column
//! starting at 0 is kept, nothing is averaged. Subsampling runs before the
//! bit-depth reduction; the two steps commute and this order touches fewer
//! pixels.

use bytes::Bytes;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Pixel, Rgba, RgbaImage};

use crate::error::TileError;

use super::encoder::{decode_mono16, Mono16Image, PngTileEncoder};
use super::modifiers::RenderRequest;

/// Highest 8-bit sample value; pixels at this value are saturated.
pub const SATURATED: u8 = u8::MAX;

/// Color used for saturated pixels when highlighting.
pub const HIGHLIGHT_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Render a tile from encoded source bytes.
///
/// This is CPU-bound and synchronous; callers on an async runtime should run
/// it on the blocking pool.
pub fn render_tile(
    source: &[u8],
    request: &RenderRequest,
    encoder: &PngTileEncoder,
) -> Result<Bytes, TileError> {
    let source = decode_mono16(source)?;
    let rendered = render_image(&source, request);
    encoder.encode(&rendered)
}

/// Apply the pixel pipeline to a decoded source image.
///
/// Returns 8-bit grayscale, or 8-bit RGBA when highlighting is requested.
pub fn render_image(source: &Mono16Image, request: &RenderRequest) -> DynamicImage {
    let sampled = subsample(source, request.downsample_factor());
    let mut tile = reduce_to_8bit(&sampled);
    apply_brightness(&mut tile, request.brightness);

    if request.highlight_saturated {
        DynamicImage::ImageRgba8(highlight_saturated(&tile))
    } else {
        DynamicImage::ImageLuma8(tile)
    }
}

/// Output dimensions for a source of `width × height` at `factor`.
pub fn subsampled_dimensions(width: u32, height: u32, factor: u32) -> (u32, u32) {
    let factor = factor.max(1);
    (width.div_ceil(factor), height.div_ceil(factor))
}

/// Keep every `factor`-th row and column, starting at index 0.
pub fn subsample<P>(
    img: &ImageBuffer<P, Vec<P::Subpixel>>,
    factor: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let factor = factor.max(1);
    let (width, height) = subsampled_dimensions(img.width(), img.height(), factor);

    ImageBuffer::from_fn(width, height, |x, y| *img.get_pixel(x * factor, y * factor))
}

/// Drop the low byte of every sample.
pub fn reduce_to_8bit(img: &Mono16Image) -> GrayImage {
    let (width, height) = img.dimensions();
    let samples = img.as_raw().iter().map(|&v| (v >> 8) as u8).collect();

    // Same dimensions, one sample per pixel
    GrayImage::from_raw(width, height, samples).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Scale every sample, clip to [0, 255] and truncate.
pub fn apply_brightness(img: &mut GrayImage, brightness: f64) {
    if brightness == 1.0 {
        return;
    }

    for Luma([value]) in img.pixels_mut() {
        *value = (*value as f64 * brightness).clamp(0.0, 255.0) as u8;
    }
}

/// Expand to RGBA and paint saturated pixels red.
pub fn highlight_saturated(img: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let Luma([value]) = *img.get_pixel(x, y);
        if value == SATURATED {
            HIGHLIGHT_COLOR
        } else {
            Rgba([value, value, value, 255])
        }
    })
}

// =============================================================================
// Tests
// =============================================================================

//! Filename modifier decoding.
//!
//! Tile requests carry their rendering parameters as extra dot-separated
//! segments in the file name:
//!
//! ```text
//! plate_1/A01_site1.tif.b1_5.halfres.saturated
//! └──────── source ───────┘ │     │       └ highlight saturated pixels
//!                           │     └ resolution marker (downsample by 2)
//!                           └ brightness factor 1.5
//! ```
//!
//! # Grammar
//!
//! Every segment after the base name is classified on its own:
//!
//! | Segment                               | Effect                          |
//! |---------------------------------------|---------------------------------|
//! | `saturated`                           | highlight saturated pixels      |
//! | `b<digit>_<digit>`                    | brightness `<digit>.<digit>`    |
//! | `highres` `halfres` `midres` `lowres` | downsample factor 1 / 2 / 5 / 10 |
//! | anything else                         | part of the source path         |
//!
//! Markers are case-sensitive. Anything that is not a marker is kept, in
//! order, and the kept segments rejoined with `.` form the source path.
//!
//! # Conflicts
//!
//! - Only the first brightness segment is consumed. Later brightness-shaped
//!   segments stay in the source path, which then usually fails to resolve.
//! - All resolution markers are consumed. When several are present the
//!   lowest resolution wins, so `x.png.highres.lowres` renders at factor 10.
//! - `saturated` may appear any number of times.

/// Extensions of source images that are rendered as tiles (case-insensitive).
pub const MONO_IMAGE_EXTENSIONS: &[&str] = &[".png", ".tif", ".tiff"];

/// Highlight marker segment.
const SATURATED_MARKER: &str = "saturated";

/// Brightness used when the path carries no brightness segment.
pub const DEFAULT_BRIGHTNESS: f64 = 1.0;

// =============================================================================
// Resolution
// =============================================================================

/// Output resolution selected by a path marker.
///
/// Variants are ordered from highest to lowest resolution; conflict
/// resolution picks the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Resolution {
    /// `highres`: every pixel
    High,
    /// `halfres`: every 2nd row and column
    Half,
    /// `midres`: every 5th row and column
    #[default]
    Mid,
    /// `lowres`: every 10th row and column
    Low,
}

impl Resolution {
    /// Parse a resolution marker segment.
    pub fn from_marker(segment: &str) -> Option<Self> {
        match segment {
            "highres" => Some(Resolution::High),
            "halfres" => Some(Resolution::Half),
            "midres" => Some(Resolution::Mid),
            "lowres" => Some(Resolution::Low),
            _ => None,
        }
    }

    /// The marker segment for this resolution.
    pub fn marker(self) -> &'static str {
        match self {
            Resolution::High => "highres",
            Resolution::Half => "halfres",
            Resolution::Mid => "midres",
            Resolution::Low => "lowres",
        }
    }

    /// Row/column stride used when subsampling.
    pub fn downsample_factor(self) -> u32 {
        match self {
            Resolution::High => 1,
            Resolution::Half => 2,
            Resolution::Mid => 5,
            Resolution::Low => 10,
        }
    }
}

/// Parse a brightness segment of the form `b<digit>_<digit>`.
///
/// The underscore stands in for the decimal point: `b1_5` is 1.5.
pub fn parse_brightness(segment: &str) -> Option<f64> {
    match segment.as_bytes() {
        [b'b', whole, b'_', tenth] if whole.is_ascii_digit() && tenth.is_ascii_digit() => {
            format!("{}.{}", *whole as char, *tenth as char).parse().ok()
        }
        _ => None,
    }
}

/// Check if a path has a monochrome source image extension.
pub fn is_mono_image_path(path: &str) -> bool {
    let path_lower = path.to_ascii_lowercase();
    MONO_IMAGE_EXTENSIONS
        .iter()
        .any(|ext| path_lower.ends_with(ext))
}

// =============================================================================
// Render Request
// =============================================================================

/// Rendering parameters decoded from a tile request path.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Path of the source image, relative to the source root
    pub source_path: String,

    /// Requested output resolution
    pub resolution: Resolution,

    /// Multiplier applied to 8-bit samples before clipping
    pub brightness: f64,

    /// Recolor pixels at 255 (after brightness) to opaque red
    pub highlight_saturated: bool,
}

impl RenderRequest {
    /// Create a request with default parameters for a source path.
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            resolution: Resolution::default(),
            brightness: DEFAULT_BRIGHTNESS,
            highlight_saturated: false,
        }
    }

    /// Decode a raw request path.
    ///
    /// Returns `None` when the path, with modifiers stripped, does not end
    /// in a monochrome image extension. Such paths are not tile requests.
    /// Whether the source exists is not checked here.
    pub fn parse(raw_path: &str) -> Option<Self> {
        let raw_path = raw_path.trim_start_matches('/');
        let mut segments = raw_path.split('.');

        // The base name is never a marker
        let mut kept: Vec<&str> = segments.next().into_iter().collect();
        let mut brightness = None;
        let mut resolution: Option<Resolution> = None;
        let mut highlight_saturated = false;

        for segment in segments {
            if segment == SATURATED_MARKER {
                highlight_saturated = true;
                continue;
            }

            if brightness.is_none() {
                if let Some(value) = parse_brightness(segment) {
                    brightness = Some(value);
                    continue;
                }
            }

            if let Some(marker) = Resolution::from_marker(segment) {
                resolution = Some(resolution.map_or(marker, |current| current.max(marker)));
                continue;
            }

            kept.push(segment);
        }

        let source_path = kept.join(".");
        if !is_mono_image_path(&source_path) {
            return None;
        }

        Some(Self {
            source_path,
            resolution: resolution.unwrap_or_default(),
            brightness: brightness.unwrap_or(DEFAULT_BRIGHTNESS),
            highlight_saturated,
        })
    }

    /// Row/column stride used when subsampling.
    pub fn downsample_factor(&self) -> u32 {
        self.resolution.downsample_factor()
    }
}

// =============================================================================
// Tests
// =============================================================================

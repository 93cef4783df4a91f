//! Acquisition planning computations.
//!
//! Two pure helpers used by the acquisition UI before a plate is imaged:
//! where the output will be written, and how much disk it may need. Neither
//! touches the filesystem.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Edge length, in pixels, assumed for every captured image.
pub const IMAGE_EDGE_PIXELS: u64 = 2500;

// =============================================================================
// Output Path
// =============================================================================

/// Request body for `POST /api/fullPathName`.
#[derive(Debug, Clone, Deserialize)]
pub struct FullPathRequest {
    pub base_path: String,
    pub project_name: String,
    pub plate_name: String,
}

/// Response body for `POST /api/fullPathName`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FullPathResponse {
    pub full_output_path: String,
}

/// Join base path, project and plate into the acquisition output directory.
///
/// Trailing slashes on `base_path` are dropped so `"/data/"` and `"/data"`
/// give the same result.
pub fn full_output_path(request: &FullPathRequest) -> String {
    let base = request.base_path.trim_end_matches('/');
    format!("{}/{}/{}", base, request.project_name, request.plate_name)
}

// =============================================================================
// Storage Estimate
// =============================================================================

/// Camera pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelDepth {
    Mono8,
    Mono12,
}

impl PixelDepth {
    /// Parse a camera pixel format handle.
    pub fn from_handle(handle: &str) -> Result<Self, ApiError> {
        match handle {
            "mono8" => Ok(PixelDepth::Mono8),
            "mono12" => Ok(PixelDepth::Mono12),
            other => Err(ApiError::UnsupportedPixelDepth {
                handle: other.to_string(),
            }),
        }
    }

    /// Bytes stored per pixel. 12-bit samples are stored in 16 bits.
    pub fn bytes_per_pixel(self) -> u64 {
        match self {
            PixelDepth::Mono8 => 1,
            PixelDepth::Mono12 => 2,
        }
    }
}

/// Pixel format selector as sent by the UI.
#[derive(Debug, Clone, Deserialize)]
pub struct PixelDepthSelection {
    pub handle: String,
}

/// Imaging grid per well: sites in x/y, z-planes, and timepoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AcquisitionGrid {
    pub num_x: u64,
    pub num_y: u64,
    pub num_z: u64,
    pub num_t: u64,
}

impl AcquisitionGrid {
    /// Number of images captured per well, or `None` on overflow.
    pub fn images_per_well(&self) -> Option<u64> {
        self.num_x
            .checked_mul(self.num_y)?
            .checked_mul(self.num_z)?
            .checked_mul(self.num_t)
    }
}

/// Request body for `POST /api/requiredStorage`.
#[derive(Debug, Clone, Deserialize)]
pub struct RequiredStorageRequest {
    pub pixel_depth: PixelDepthSelection,
    pub grid: AcquisitionGrid,

    /// Plate layout, rows of wells; `true` marks a well that will be imaged
    pub well_selection: Vec<Vec<bool>>,
}

/// Response body for `POST /api/requiredStorage`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequiredStorageResponse {
    pub max_required_storage: u64,
}

/// Number of wells marked for imaging.
pub fn selected_well_count(selection: &[Vec<bool>]) -> u64 {
    selection
        .iter()
        .flatten()
        .filter(|&&selected| selected)
        .count() as u64
}

/// Upper bound, in bytes, on the storage an acquisition will need.
///
/// `selected wells × images per well × bytes per pixel × 2500 × 2500`
pub fn required_storage(request: &RequiredStorageRequest) -> Result<u64, ApiError> {
    let depth = PixelDepth::from_handle(&request.pixel_depth.handle)?;
    let wells = selected_well_count(&request.well_selection);

    request
        .grid
        .images_per_well()
        .and_then(|images| wells.checked_mul(images))
        .and_then(|images| images.checked_mul(depth.bytes_per_pixel()))
        .and_then(|bytes| bytes.checked_mul(IMAGE_EDGE_PIXELS * IMAGE_EDGE_PIXELS))
        .ok_or(ApiError::StorageOverflow)
}

// =============================================================================
// Tests
// =============================================================================

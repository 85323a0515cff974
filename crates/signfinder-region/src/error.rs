//! Error types for signfinder-region

use thiserror::Error;

/// Errors from blob labeling and filtering
#[derive(Error, Debug)]
pub enum RegionError {
    /// The input mask has a zero dimension
    #[error("empty mask: {width}x{height}")]
    EmptyMask { width: u32, height: u32 },

    /// Filter was given an image size inconsistent with the blobs
    #[error("invalid image size: {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },
}

/// Result type alias for region operations
pub type RegionResult<T> = std::result::Result<T, RegionError>;

//! Error types for signfinder-color

use crate::colorspace::ColorSpace;
use thiserror::Error;

/// Errors from histogram construction, persistence, and classification
#[derive(Error, Debug)]
pub enum ColorError {
    /// Bin count outside the supported range
    #[error("invalid bin count: {0} (must be >= 2)")]
    InvalidBinCount(u32),

    /// Two histograms with different axis dimensions were combined
    #[error("histogram dimension mismatch: {expected_x}x{expected_y} vs {actual_x}x{actual_y}")]
    DimensionMismatch {
        expected_x: u32,
        expected_y: u32,
        actual_x: u32,
        actual_y: u32,
    },

    /// Two histograms built in different color spaces were combined
    #[error("color space mismatch: {expected:?} vs {actual:?}")]
    SpaceMismatch {
        expected: ColorSpace,
        actual: ColorSpace,
    },

    /// Mask dimensions do not match the image being processed
    #[error("mask size {mask_w}x{mask_h} does not match image size {img_w}x{img_h}")]
    MaskSizeMismatch {
        mask_w: u32,
        mask_h: u32,
        img_w: u32,
        img_h: u32,
    },

    /// A persisted model file could not be parsed
    #[error("malformed histogram file: {0}")]
    MalformedModel(String),

    /// I/O error while reading or writing a model file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for color operations
pub type ColorResult<T> = std::result::Result<T, ColorError>;

//! Error types for signfinder-geom

use thiserror::Error;

/// Errors from corner extraction and rectification
#[derive(Error, Debug)]
pub enum GeomError {
    /// The hull walk found more corners than the quadrilateral allows
    #[error("found too many corners: {found} (expected {expected})")]
    TooManyCorners { found: usize, expected: usize },

    /// Not enough corners to form a quadrilateral
    #[error("found too few corners: {found} (expected {expected})")]
    TooFewCorners { found: usize, expected: usize },

    /// Two adjacent corners are closer than the minimum separation
    #[error("corners {a} and {b} are {dist:.1}px apart (minimum {min:.1}px)")]
    CornersTooClose { a: usize, b: usize, dist: f64, min: f64 },

    /// The corner-to-target correspondence system has no solution
    #[error("perspective correspondence is singular")]
    SingularTransform,

    /// The computed target rectangle has a zero dimension
    #[error("degenerate rectification target: {width}x{height}")]
    DegenerateTarget { width: u32, height: u32 },

    /// An extractor was given an empty hull or mask
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
}

/// Result type alias for geometry operations
pub type GeomResult<T> = std::result::Result<T, GeomError>;

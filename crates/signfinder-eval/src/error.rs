//! Error types for signfinder-eval

use thiserror::Error;

/// Errors from ground-truth scoring
#[derive(Error, Debug)]
pub enum EvalError {
    /// The labeled mask contains no foreground, overlap is undefined
    #[error("labeled mask has no foreground pixels")]
    EmptyLabel,

    /// Ground-truth file could not be read
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Ground-truth mask could not be decoded
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Labeling the ground-truth mask failed
    #[error(transparent)]
    Region(#[from] signfinder_region::RegionError),
}

/// Result type alias for scoring operations
pub type EvalResult<T> = std::result::Result<T, EvalError>;

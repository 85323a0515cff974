//! Error types for signfinder-text

use thiserror::Error;

/// Errors from the OCR adapter
#[derive(Error, Debug)]
pub enum TextError {
    /// The OCR subprocess did not finish within the allowed time
    #[error("OCR timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The OCR subprocess exited with a failure status
    #[error("OCR command `{command}` failed with {status}")]
    CommandFailed { command: String, status: std::process::ExitStatus },

    /// Scratch file or subprocess I/O failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The crop could not be written for the subprocess
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result type alias for text operations
pub type TextResult<T> = std::result::Result<T, TextError>;

//! Pipeline-level error type

use thiserror::Error;

/// Any failure surfaced by the sign-finding pipeline
#[derive(Error, Debug)]
pub enum SignFinderError {
    #[error(transparent)]
    Color(#[from] signfinder_color::ColorError),

    #[error(transparent)]
    Region(#[from] signfinder_region::RegionError),

    #[error(transparent)]
    Geom(#[from] signfinder_geom::GeomError),

    #[error(transparent)]
    Text(#[from] signfinder_text::TextError),

    #[error(transparent)]
    Eval(#[from] signfinder_eval::EvalError),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations
pub type SignFinderResult<T> = std::result::Result<T, SignFinderError>;

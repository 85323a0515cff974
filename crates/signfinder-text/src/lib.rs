//! signfinder-text - Turning rectified sign crops into street names
//!
//! - [`OcrEngine`] is the collaborator boundary to the actual
//!   character recognizer; [`TesseractOcr`] adapts the `tesseract`
//!   command line behind it
//! - [`postprocess`] applies the street-name correction heuristics to
//!   a raw OCR reading
//! - [`levenshtein`] is the edit distance used both by the corrections
//!   and by scoring

mod distance;
mod error;
mod ocr;
mod postprocess;

pub use distance::levenshtein;
pub use error::{TextError, TextResult};
pub use ocr::{OcrEngine, TesseractOcr};
pub use postprocess::postprocess;

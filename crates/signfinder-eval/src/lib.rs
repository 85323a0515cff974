//! signfinder-eval - Scoring detections against labeled ground truth
//!
//! Ground truth for an image `foo.jpg` is a hand-labeled mask
//! `foo.jpg_mask.png` and a text file `foo.jpg.txt` with one correct
//! reading per line. This crate scores a run against both:
//!
//! - [`compare_masks`] measures pixel overlap between an estimated and
//!   a labeled mask
//! - [`check_labeled_blobs`] matches detected blobs to labeled sign
//!   regions and counts false positives, false negatives and multiple
//!   detections
//! - [`compare_text`] scores an OCR reading by edit distance
//! - [`RunStatistics`] aggregates everything over a batch; the caller
//!   owns and folds the instance, there is no global state

mod blobs;
mod error;
mod masks;
mod stats;
mod text;
mod truth;

pub use blobs::{BlobCheck, check_labeled_blobs};
pub use error::{EvalError, EvalResult};
pub use masks::{MaskScore, MatchThresholds, blob_accepted, compare_masks};
pub use stats::{DetectionStats, OcrStats, RunStatistics};
pub use text::compare_text;
pub use truth::{load_truth_mask, load_truth_text, mask_path, text_path};

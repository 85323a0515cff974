//! Pixel-overlap scoring between estimated and labeled masks

use image::GrayImage;
use image::imageops::{self, FilterType};

use crate::error::{EvalError, EvalResult};

/// Overlap fractions from [`compare_masks`], both relative to the
/// labeled area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskScore {
    /// Fraction of the labeled area covered by the estimate
    pub tp: f64,
    /// Estimated area outside the label, as a fraction of the labeled
    /// area
    pub fp: f64,
}

/// Acceptance thresholds for [`blob_accepted`]
#[derive(Debug, Clone, Copy)]
pub struct MatchThresholds {
    pub min_tp: f64,
    pub max_fp: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        MatchThresholds { min_tp: 0.60, max_fp: 0.25 }
    }
}

fn foreground_count(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|p| p[0] != 0).count() as u64
}

/// Scores an estimated mask against a labeled one.
///
/// The label is resampled (nearest neighbor) to the estimate's
/// resolution when the sizes differ. Both fractions use the labeled
/// area as denominator; an empty label is an error.
pub fn compare_masks(estimate: &GrayImage, label: &GrayImage) -> EvalResult<MaskScore> {
    let resized;
    let label = if estimate.dimensions() != label.dimensions() {
        resized = imageops::resize(label, estimate.width(), estimate.height(), FilterType::Nearest);
        &resized
    } else {
        label
    };

    let label_area = foreground_count(label);
    if label_area == 0 {
        return Err(EvalError::EmptyLabel);
    }
    let estimate_area = foreground_count(estimate);
    let intersection = estimate
        .pixels()
        .zip(label.pixels())
        .filter(|(e, l)| e[0] != 0 && l[0] != 0)
        .count() as u64;

    Ok(MaskScore {
        tp: intersection as f64 / label_area as f64,
        fp: (estimate_area - intersection) as f64 / label_area as f64,
    })
}

/// Whether an estimated blob corresponds to a labeled sign.
///
/// `n_overlapping` is the number of detected blobs overlapping the
/// same labeled region; splitting one sign over n blobs relaxes the
/// coverage requirement and tightens the false-positive budget
/// accordingly.
pub fn blob_accepted(score: MaskScore, n_overlapping: u32, thresholds: &MatchThresholds) -> bool {
    let n = n_overlapping.max(1) as f64;
    score.tp * n > thresholds.min_tp && score.fp < thresholds.max_fp / n
}

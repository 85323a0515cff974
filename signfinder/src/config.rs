//! Pipeline configuration

use std::path::PathBuf;
use std::time::Duration;

use signfinder_eval::MatchThresholds;
use signfinder_region::ShapeFilterParams;

/// Everything tunable about a [`crate::SignFinder`] run.
///
/// The defaults are the operating point the histogram models were
/// trained and evaluated at; the classifier threshold in particular
/// trades detection rate against false positives and moves together
/// with the training data.
#[derive(Debug, Clone)]
pub struct SignFinderConfig {
    /// Trained sign-color histogram
    pub positive_model: PathBuf,
    /// Trained background-color histogram
    pub negative_model: PathBuf,
    /// Likelihood-ratio threshold of the Bayesian classifier
    pub ratio_threshold: f32,
    /// Images are resampled to this resolution before classification;
    /// `None` processes at native resolution
    pub working_size: Option<(u32, u32)>,
    /// Blob acceptance thresholds
    pub shape_filter: ShapeFilterParams,
    /// Corner separation floor, as a fraction of the blob's minor
    /// ellipse axis (the plate height)
    pub corner_dist_factor: f64,
    /// Detection scoring thresholds (ground-truth runs only)
    pub match_thresholds: MatchThresholds,
    /// OCR command invoked per sign
    pub ocr_command: String,
    /// Kill the OCR subprocess after this long
    pub ocr_timeout: Duration,
}

impl SignFinderConfig {
    pub fn new(positive_model: impl Into<PathBuf>, negative_model: impl Into<PathBuf>) -> Self {
        SignFinderConfig {
            positive_model: positive_model.into(),
            negative_model: negative_model.into(),
            ratio_threshold: signfinder_color::DEFAULT_RATIO_THRESHOLD,
            working_size: Some((1600, 1200)),
            shape_filter: ShapeFilterParams::default(),
            corner_dist_factor: 0.75,
            match_thresholds: MatchThresholds::default(),
            ocr_command: "tesseract".to_string(),
            ocr_timeout: Duration::from_secs(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SignFinderConfig::new("pos.hist", "neg.hist");
        assert_eq!(c.ratio_threshold, 0.19);
        assert_eq!(c.working_size, Some((1600, 1200)));
        assert_eq!(c.corner_dist_factor, 0.75);
        assert_eq!(c.ocr_command, "tesseract");
    }
}

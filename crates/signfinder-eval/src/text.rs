//! OCR reading vs ground-truth text

use signfinder_text::levenshtein;

/// Minimum edit distance between a detected reading and any labeled
/// line.
///
/// A label file may carry one correct reading per sign in the image;
/// the closest one is assumed to be the sign that was actually read.
/// Returns `None` when there are no labeled lines to compare against.
pub fn compare_text(detected: &str, labels: &[String]) -> Option<u32> {
    labels
        .iter()
        .map(|label| levenshtein(label.trim(), detected.trim()))
        .min()
}

//! Matching detected blobs against labeled sign regions

use image::GrayImage;
use log::debug;
use signfinder_region::{Blob, Connectivity, fill_convex_hull, label_blobs};

use crate::error::EvalResult;
use crate::masks::{MatchThresholds, blob_accepted, compare_masks};

/// Per-image correspondence counts from [`check_labeled_blobs`]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BlobCheck {
    /// Detected blobs matching no labeled region
    pub false_positives: u32,
    /// Labeled regions matched by no detected blob
    pub false_negatives: u32,
    /// Matches beyond the first per labeled region
    pub multiple_detections: u32,
    /// Indices into the detected slice that matched some region
    pub correct: Vec<usize>,
    /// Indices into the detected slice that matched nothing
    pub incorrect: Vec<usize>,
}

impl BlobCheck {
    /// True when the image was handled without any detection error
    pub fn clean(&self) -> bool {
        self.false_positives == 0 && self.false_negatives == 0 && self.multiple_detections == 0
    }
}

/// Checks detected blobs against the labeled regions of a truth mask.
///
/// The truth mask is labeled itself; its blobs are kept when they
/// cover at least 1/1000 of the mask and do not touch the border (the
/// same exclusions the detector applies, with a laxer area bar since
/// labels are hand-drawn). Each detected blob and each labeled blob
/// is rendered as its filled convex hull and the pair is scored by
/// mask overlap.
pub fn check_labeled_blobs(
    detected: &[Blob],
    img_w: u32,
    img_h: u32,
    truth_mask: &GrayImage,
    thresholds: &MatchThresholds,
) -> EvalResult<BlobCheck> {
    let (mask_w, mask_h) = truth_mask.dimensions();
    let min_area = (mask_w as f64 * mask_h as f64) / 1000.0;
    let labeled: Vec<Blob> = label_blobs(truth_mask, Connectivity::EightWay)?
        .into_iter()
        .filter(|b| b.area >= min_area && !b.bbox.touches_border(mask_w, mask_h))
        .collect();
    debug!("truth mask has {} qualifying regions", labeled.len());

    let labeled_filled: Vec<GrayImage> = labeled
        .iter()
        .map(|b| fill_convex_hull(mask_w, mask_h, &b.hull))
        .collect();

    let mut match_counts = vec![0u32; labeled.len()];
    let mut check = BlobCheck::default();
    for (i, blob) in detected.iter().enumerate() {
        let detected_filled = fill_convex_hull(img_w, img_h, &blob.hull);
        let mut found = false;
        for (j, label_filled) in labeled_filled.iter().enumerate() {
            let score = compare_masks(&detected_filled, label_filled)?;
            if blob_accepted(score, 1, thresholds) {
                found = true;
                match_counts[j] += 1;
            }
        }
        if found {
            check.correct.push(i);
        } else {
            check.incorrect.push(i);
        }
    }

    let matched_regions = match_counts.iter().filter(|&&c| c > 0).count() as u32;
    let total_matches: u32 = match_counts.iter().sum();
    check.multiple_detections = total_matches - matched_regions;
    // A blob spanning several regions still counts as one match, so
    // false positives come from the per-blob accounting.
    check.false_positives = check.incorrect.len() as u32;
    check.false_negatives = labeled.len() as u32 - matched_regions;
    Ok(check)
}

//! Run-wide performance aggregates
//!
//! The caller owns one [`RunStatistics`] per run and folds per-image
//! results into it; parallel runs keep one instance per worker and
//! [`RunStatistics::merge`] them at the end.

use std::fmt::Write;

use crate::blobs::BlobCheck;

/// Detection accuracy over the images that had a ground-truth mask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionStats {
    pub images_checked: u32,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub multiple_detections: u32,
    /// Images with at least one detection error
    pub images_with_errors: u32,
}

impl DetectionStats {
    pub fn record(&mut self, check: &BlobCheck) {
        self.images_checked += 1;
        self.false_positives += check.false_positives;
        self.false_negatives += check.false_negatives;
        self.multiple_detections += check.multiple_detections;
        if !check.clean() {
            self.images_with_errors += 1;
        }
    }

    pub fn merge(&mut self, other: &DetectionStats) {
        self.images_checked += other.images_checked;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
        self.multiple_detections += other.multiple_detections;
        self.images_with_errors += other.images_with_errors;
    }
}

/// OCR accuracy over the signs that had a ground-truth reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OcrStats {
    pub signs_checked: u32,
    pub signs_correct: u32,
    pub total_edit_distance: u64,
}

impl OcrStats {
    pub fn record(&mut self, edit_distance: u32) {
        self.signs_checked += 1;
        if edit_distance == 0 {
            self.signs_correct += 1;
        }
        self.total_edit_distance += edit_distance as u64;
    }

    pub fn merge(&mut self, other: &OcrStats) {
        self.signs_checked += other.signs_checked;
        self.signs_correct += other.signs_correct;
        self.total_edit_distance += other.total_edit_distance;
    }
}

/// Everything measured over one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub detection: DetectionStats,
    pub ocr: OcrStats,
}

impl RunStatistics {
    pub fn merge(&mut self, other: &RunStatistics) {
        self.detection.merge(&other.detection);
        self.ocr.merge(&other.ocr);
    }

    /// Human-readable end-of-run report; empty when nothing was scored.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let d = &self.detection;
        if d.images_checked > 0 {
            let _ = writeln!(
                out,
                "In {} images we encountered {} false positives, {} false negatives, and {} multiple detections",
                d.images_checked, d.false_positives, d.false_negatives, d.multiple_detections
            );
            let clean = 100.0 * (1.0 - d.images_with_errors as f64 / d.images_checked as f64);
            let _ = writeln!(out, "{clean:.1}% of all images was processed correctly in its entirety");
        }
        let o = &self.ocr;
        if o.signs_checked > 0 {
            let pct = 100.0 * o.signs_correct as f64 / o.signs_checked as f64;
            let _ = writeln!(
                out,
                "{} out of {} signs ({pct:.1}%) were read entirely correctly",
                o.signs_correct, o.signs_checked
            );
            let avg = o.total_edit_distance as f64 / o.signs_checked as f64;
            let _ = writeln!(out, "Average edit distance to the correct label: {avg:.2}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_report() {
        let mut stats = RunStatistics::default();
        stats.detection.record(&BlobCheck::default());
        stats.detection.record(&BlobCheck { false_positives: 2, ..Default::default() });
        stats.ocr.record(0);
        stats.ocr.record(3);

        assert_eq!(stats.detection.images_checked, 2);
        assert_eq!(stats.detection.images_with_errors, 1);
        assert_eq!(stats.ocr.signs_correct, 1);

        let report = stats.report();
        assert!(report.contains("In 2 images"));
        assert!(report.contains("2 false positives"));
        assert!(report.contains("50.0%"));
        assert!(report.contains("1 out of 2 signs"));
        assert!(report.contains("1.50"));
    }

    #[test]
    fn test_merge_is_additive() {
        let mut a = RunStatistics::default();
        a.detection.record(&BlobCheck { false_negatives: 1, ..Default::default() });
        a.ocr.record(2);

        let mut b = RunStatistics::default();
        b.detection.record(&BlobCheck::default());
        b.ocr.record(0);

        a.merge(&b);
        assert_eq!(a.detection.images_checked, 2);
        assert_eq!(a.detection.false_negatives, 1);
        assert_eq!(a.detection.images_with_errors, 1);
        assert_eq!(a.ocr.signs_checked, 2);
        assert_eq!(a.ocr.total_edit_distance, 2);
    }

    #[test]
    fn test_empty_run_reports_nothing() {
        assert!(RunStatistics::default().report().is_empty());
    }
}

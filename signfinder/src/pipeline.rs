//! Pipeline orchestration
//!
//! One [`SignFinder`] owns the trained classifier and the OCR engine
//! and processes images to completion, one at a time. Failures while
//! handling a single sign candidate (corner extraction, OCR) are
//! recoverable and logged; failures loading the models are fatal at
//! construction.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use log::{debug, info, warn};

use signfinder_color::BayesClassifier;
use signfinder_eval::{
    BlobCheck, RunStatistics, check_labeled_blobs, compare_text, load_truth_mask, load_truth_text,
};
use signfinder_geom::{
    AngleParams, CornerSet, FeatureParams, Rectifier, corners_from_features, corners_from_hull,
};
use signfinder_region::{Blob, Connectivity, ShapeFilter, fill_convex_hull, label_blobs};
use signfinder_text::{OcrEngine, TesseractOcr, postprocess};

use crate::config::SignFinderConfig;
use crate::error::SignFinderResult;

/// Cooperative cancellation for batch runs.
///
/// Checked between images, never mid-image; share it with the thread
/// that wants to stop the run.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One sign cut out of an image and read
#[derive(Debug)]
pub struct SignReading {
    /// Corner positions in working-resolution coordinates
    pub corners: CornerSet,
    /// The rectified crop
    pub crop: RgbImage,
    /// Post-corrected OCR reading; empty when OCR failed
    pub text: String,
    /// Edit distance to the closest labeled reading, when ground
    /// truth exists
    pub edit_distance: Option<u32>,
}

/// Everything produced for one input image
#[derive(Debug)]
pub struct ImageReport {
    pub signs: Vec<SignReading>,
    /// Detection scoring, when a labeled mask exists
    pub check: Option<BlobCheck>,
}

struct Detection {
    accepted: Vec<Blob>,
    signs: Vec<SignReading>,
}

/// The sign-finding pipeline
pub struct SignFinder {
    config: SignFinderConfig,
    classifier: BayesClassifier,
    filter: ShapeFilter,
    rectifier: Rectifier,
    ocr: Box<dyn OcrEngine>,
}

impl SignFinder {
    /// Loads the trained models and wires up the given OCR engine.
    pub fn new(config: SignFinderConfig, ocr: Box<dyn OcrEngine>) -> SignFinderResult<Self> {
        let classifier = BayesClassifier::load(
            &config.positive_model,
            &config.negative_model,
            config.ratio_threshold,
        )?;
        let filter = ShapeFilter::new(config.shape_filter);
        Ok(SignFinder { config, classifier, filter, rectifier: Rectifier::new(), ocr })
    }

    /// Loads the models and uses the configured tesseract command.
    pub fn with_tesseract(config: SignFinderConfig) -> SignFinderResult<Self> {
        let ocr = TesseractOcr::new(config.ocr_command.clone(), config.ocr_timeout);
        Self::new(config, Box::new(ocr))
    }

    pub fn classifier(&self) -> &BayesClassifier {
        &self.classifier
    }

    /// Detects and reads the signs in an in-memory image.
    pub fn read_signs(&self, image: &RgbImage) -> SignFinderResult<Vec<SignReading>> {
        let working = to_working_size(image.clone(), self.config.working_size);
        Ok(self.detect(&working)?.signs)
    }

    /// Processes one file end to end, folding any ground-truth scores
    /// into `stats`.
    pub fn process_file(
        &self,
        path: &Path,
        stats: &mut RunStatistics,
    ) -> SignFinderResult<ImageReport> {
        info!("processing {}", path.display());
        let image = image::open(path)?.to_rgb8();
        let working = to_working_size(image, self.config.working_size);
        let mut detection = self.detect(&working)?;

        let check = match load_truth_mask(path)? {
            Some(mask) => {
                let check = check_labeled_blobs(
                    &detection.accepted,
                    working.width(),
                    working.height(),
                    &mask,
                    &self.config.match_thresholds,
                )?;
                info!(
                    "for this image: {} false positives, {} undetected signs, {} multiple detections",
                    check.false_positives, check.false_negatives, check.multiple_detections
                );
                stats.detection.record(&check);
                Some(check)
            }
            None => {
                warn!("no labeled mask for {}", path.display());
                None
            }
        };

        match load_truth_text(path)? {
            Some(lines) => {
                for sign in &mut detection.signs {
                    if let Some(dist) = compare_text(&sign.text, &lines) {
                        debug!("edit distance to label: {dist}");
                        sign.edit_distance = Some(dist);
                        stats.ocr.record(dist);
                    }
                }
            }
            None => warn!("no labeled text for {}", path.display()),
        }

        Ok(ImageReport { signs: detection.signs, check })
    }

    /// Processes a batch of files, reporting each result through
    /// `on_report`. Per-file failures are logged and never abort the
    /// batch; cancellation is honored between files.
    pub fn run_batch<F>(&self, files: &[PathBuf], cancel: &CancelToken, mut on_report: F) -> RunStatistics
    where
        F: FnMut(&Path, &ImageReport),
    {
        let mut stats = RunStatistics::default();
        for file in files {
            if cancel.is_cancelled() {
                info!("cancelled, stopping batch");
                break;
            }
            match self.process_file(file, &mut stats) {
                Ok(report) => on_report(file, &report),
                Err(err) => warn!("failed to process {}: {err}", file.display()),
            }
        }
        stats
    }

    fn detect(&self, working: &RgbImage) -> SignFinderResult<Detection> {
        let mask = self.classifier.classify(working, None)?;
        let blobs = label_blobs(&mask, Connectivity::EightWay)?;
        let outcome = self.filter.run(blobs, working.width(), working.height())?;
        info!("{} sign candidates accepted, {} rejected", outcome.accepted.len(), outcome.rejected.len());

        let mut signs = Vec::with_capacity(outcome.accepted.len());
        for blob in &outcome.accepted {
            match self.cut_and_read(working, blob) {
                Ok(reading) => {
                    info!("reading street sign: {}", reading.text);
                    signs.push(reading);
                }
                Err(err) => warn!("skipping sign candidate: {err}"),
            }
        }
        Ok(Detection { accepted: outcome.accepted, signs })
    }

    fn cut_and_read(&self, working: &RgbImage, blob: &Blob) -> SignFinderResult<SignReading> {
        // The minor axis tracks the plate height; corners of a real
        // sign are never closer than most of that.
        let dist_thr = self.config.corner_dist_factor * blob.minor_axis;
        let corners = self.extract_corners(blob, dist_thr)?;
        let crop = self.rectifier.rectify(working, &corners)?;

        // Blue plates with white lettering have their best contrast in
        // the red channel.
        let gray = red_channel(&crop);
        let text = match self.ocr.recognize(&gray) {
            Ok(raw) => postprocess(&raw),
            Err(err) => {
                warn!("OCR failed: {err}");
                String::new()
            }
        };
        Ok(SignReading { corners, crop, text, edit_distance: None })
    }

    fn extract_corners(&self, blob: &Blob, dist_thr: f64) -> SignFinderResult<CornerSet> {
        // Feature detection needs a margin so corner windows do not
        // clip at the mask edge.
        let mask = fill_convex_hull(blob.bbox.max_x + 10, blob.bbox.max_y + 10, &blob.hull);
        match corners_from_features(&mask, dist_thr, &FeatureParams::default()) {
            Ok(corners) => Ok(corners),
            Err(err) => {
                debug!("feature corners failed ({err}), falling back to the hull walk");
                Ok(corners_from_hull(&blob.hull, &AngleParams::new(dist_thr))?)
            }
        }
    }
}

/// Resamples to the configured working resolution, if any.
fn to_working_size(image: RgbImage, size: Option<(u32, u32)>) -> RgbImage {
    match size {
        Some((w, h)) if image.dimensions() != (w, h) => {
            debug!("resizing {}x{} input to {w}x{h}", image.width(), image.height());
            imageops::resize(&image, w, h, FilterType::Triangle)
        }
        _ => image,
    }
}

/// Grayscale of the red channel only.
fn red_channel(image: &RgbImage) -> GrayImage {
    let mut out = GrayImage::new(image.width(), image.height());
    for (x, y, px) in image.enumerate_pixels() {
        out.put_pixel(x, y, image::Luma([px[0]]));
    }
    out
}

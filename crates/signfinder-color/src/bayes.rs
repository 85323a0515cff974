//! Bayesian per-pixel color classification
//!
//! Two joint histograms, one trained on sign pixels and one on
//! background, turn into a binary classifier through a
//! likelihood-ratio test: a pixel is foreground when
//! `pos[bin] / neg[bin] >= threshold`. The threshold is the operating
//! point trading precision against recall.

use crate::colorspace::ColorSpace;
use crate::error::{ColorError, ColorResult};
use crate::histogram::JointHistogram;
use image::{GrayImage, Luma, RgbImage};
use std::path::Path;

/// Default likelihood-ratio threshold
///
/// Empirically tuned for blue Dutch street signs; favors recall.
pub const DEFAULT_RATIO_THRESHOLD: f32 = 0.19;

/// Binary pixel classifier built from a positive and a negative model
///
/// Both models must share a color space and bin dimensions; this is
/// validated once at construction, so `classify` itself cannot fail on
/// model state.
#[derive(Debug, Clone)]
pub struct BayesClassifier {
    pos: JointHistogram,
    neg: JointHistogram,
    threshold: f32,
}

impl BayesClassifier {
    /// Create a classifier from two compatible models
    ///
    /// # Errors
    ///
    /// Dimension or color-space disagreement between the models is a
    /// configuration bug and fails loudly.
    pub fn new(pos: JointHistogram, neg: JointHistogram, threshold: f32) -> ColorResult<Self> {
        if pos.space() != neg.space() {
            return Err(ColorError::SpaceMismatch {
                expected: pos.space(),
                actual: neg.space(),
            });
        }
        if pos.dimensions() != neg.dimensions() {
            let (ex, ey) = pos.dimensions();
            let (ax, ay) = neg.dimensions();
            return Err(ColorError::DimensionMismatch {
                expected_x: ex,
                expected_y: ey,
                actual_x: ax,
                actual_y: ay,
            });
        }
        Ok(Self {
            pos,
            neg,
            threshold,
        })
    }

    /// Load a classifier from two persisted model files
    ///
    /// A missing or malformed model file is fatal to the caller: there
    /// is nothing to classify with.
    pub fn load(
        pos_path: &Path,
        neg_path: &Path,
        threshold: f32,
    ) -> ColorResult<Self> {
        let pos = JointHistogram::load(pos_path)?;
        let neg = JointHistogram::load(neg_path)?;
        Self::new(pos, neg, threshold)
    }

    /// Color space the models were trained in
    pub fn space(&self) -> ColorSpace {
        self.pos.space()
    }

    /// Current likelihood-ratio threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Positive (sign) model
    pub fn positive(&self) -> &JointHistogram {
        &self.pos
    }

    /// Negative (background) model
    pub fn negative(&self) -> &JointHistogram {
        &self.neg
    }

    /// Classify every pixel of `image` into a binary mask
    ///
    /// Foreground pixels are 255, background 0. Pixels with a zero
    /// `mask` value are skipped and left background. Classification is
    /// deterministic: the same image, models, and threshold always
    /// produce the same mask.
    ///
    /// An empty negative bin cannot be divided through; the defined
    /// behavior is: positive count non-zero → foreground, both counts
    /// zero → background.
    ///
    /// # Errors
    ///
    /// Fails only if `mask` dimensions differ from the image.
    pub fn classify(
        &self,
        image: &RgbImage,
        mask: Option<&GrayImage>,
    ) -> ColorResult<GrayImage> {
        if let Some(m) = mask {
            if m.dimensions() != image.dimensions() {
                return Err(ColorError::MaskSizeMismatch {
                    mask_w: m.width(),
                    mask_h: m.height(),
                    img_w: image.width(),
                    img_h: image.height(),
                });
            }
        }

        let space = self.space();
        let mut out = GrayImage::new(image.width(), image.height());
        for (x, y, px) in image.enumerate_pixels() {
            if let Some(m) = mask {
                if m.get_pixel(x, y).0[0] == 0 {
                    continue;
                }
            }
            let (i, j) = self.pos.bin_index(space.sample(*px));
            if self.is_foreground(self.pos.get(i, j), self.neg.get(i, j)) {
                out.put_pixel(x, y, Luma([255]));
            }
        }
        Ok(out)
    }

    #[inline]
    fn is_foreground(&self, pos_count: f64, neg_count: f64) -> bool {
        if neg_count == 0.0 {
            return pos_count > 0.0;
        }
        (pos_count / neg_count) as f32 >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BLUE: Rgb<u8> = Rgb([10, 30, 200]);
    const GRAY: Rgb<u8> = Rgb([120, 120, 120]);

    /// Positive model trained on blue, negative on gray.
    fn classifier(threshold: f32) -> BayesClassifier {
        let pos_img = RgbImage::from_pixel(8, 8, BLUE);
        let neg_img = RgbImage::from_pixel(8, 8, GRAY);
        let pos = JointHistogram::from_image(&pos_img, None, ColorSpace::YCrCb, 32).unwrap();
        let neg = JointHistogram::from_image(&neg_img, None, ColorSpace::YCrCb, 32).unwrap();
        BayesClassifier::new(pos, neg, threshold).unwrap()
    }

    #[test]
    fn test_classify_separates_trained_colors() {
        let clf = classifier(DEFAULT_RATIO_THRESHOLD);
        let mut img = RgbImage::from_pixel(4, 2, GRAY);
        img.put_pixel(0, 0, BLUE);
        img.put_pixel(3, 1, BLUE);

        let mask = clf.classify(&img, None).unwrap();
        assert_eq!(mask.get_pixel(0, 0).0[0], 255);
        assert_eq!(mask.get_pixel(3, 1).0[0], 255);
        assert_eq!(mask.get_pixel(1, 0).0[0], 0);
        assert_eq!(mask.get_pixel(2, 1).0[0], 0);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let clf = classifier(DEFAULT_RATIO_THRESHOLD);
        let mut img = RgbImage::from_pixel(16, 16, GRAY);
        img.put_pixel(5, 5, BLUE);
        let a = clf.classify(&img, None).unwrap();
        let b = clf.classify(&img, None).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_exclusion_mask_forces_background() {
        let clf = classifier(DEFAULT_RATIO_THRESHOLD);
        let img = RgbImage::from_pixel(4, 4, BLUE);
        let mut mask = GrayImage::from_pixel(4, 4, Luma([255]));
        mask.put_pixel(2, 2, Luma([0]));

        let out = clf.classify(&img, Some(&mask)).unwrap();
        assert_eq!(out.get_pixel(2, 2).0[0], 0);
        assert_eq!(out.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_empty_negative_bin_policy() {
        let clf = classifier(1000.0);
        // Blue was never seen by the negative model, so even an extreme
        // threshold cannot suppress it: positive evidence wins.
        let img = RgbImage::from_pixel(2, 2, BLUE);
        let out = clf.classify(&img, None).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 255);

        // A color neither model has seen stays background.
        let img = RgbImage::from_pixel(2, 2, Rgb([200, 10, 10]));
        let out = clf.classify(&img, None).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_incompatible_models_rejected() {
        let pos = JointHistogram::new(ColorSpace::YCrCb, 32).unwrap();
        let neg = JointHistogram::new(ColorSpace::YCrCb, 64).unwrap();
        assert!(BayesClassifier::new(pos, neg, 0.19).is_err());

        let pos = JointHistogram::new(ColorSpace::Hsv, 32).unwrap();
        let neg = JointHistogram::new(ColorSpace::YCrCb, 32).unwrap();
        assert!(BayesClassifier::new(pos, neg, 0.19).is_err());
    }
}

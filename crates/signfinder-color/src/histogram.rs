//! Two-dimensional joint color histograms
//!
//! A [`JointHistogram`] counts how often each pair of
//! channel-of-interest values occurs in training pixels. Two models
//! (one trained on sign pixels, one on everything else) drive the
//! Bayesian classifier in [`crate::BayesClassifier`].

use crate::colorspace::{ColorSample, ColorSpace};
use crate::error::{ColorError, ColorResult};
use image::{GrayImage, RgbImage};

/// A 2-D histogram over the two channels of interest of a color space
///
/// Bins are laid out row-major: the first axis (index `i`) selects the
/// row, the second (index `j`) the column. Counts are `f64` so merged
/// multi-image models do not lose precision.
#[derive(Debug, Clone, PartialEq)]
pub struct JointHistogram {
    space: ColorSpace,
    bins_x: u32,
    bins_y: u32,
    counts: Vec<f64>,
}

impl JointHistogram {
    /// Create an empty histogram with `bins` bins per axis
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidBinCount`] for fewer than 2 bins.
    pub fn new(space: ColorSpace, bins: u32) -> ColorResult<Self> {
        if bins < 2 {
            return Err(ColorError::InvalidBinCount(bins));
        }
        Ok(Self {
            space,
            bins_x: bins,
            bins_y: bins,
            counts: vec![0.0; bins as usize * bins as usize],
        })
    }

    /// Build a histogram from the pixels of `image` selected by `mask`
    ///
    /// Pixels where the mask value is non-zero contribute one count to
    /// their bin; a `None` mask selects every pixel.
    ///
    /// # Errors
    ///
    /// Fails if the mask dimensions differ from the image dimensions
    /// or the bin count is invalid.
    pub fn from_image(
        image: &RgbImage,
        mask: Option<&GrayImage>,
        space: ColorSpace,
        bins: u32,
    ) -> ColorResult<Self> {
        let mut hist = Self::new(space, bins)?;
        hist.accumulate(image, mask)?;
        Ok(hist)
    }

    /// Add the selected pixels of another image to this histogram
    pub fn accumulate(&mut self, image: &RgbImage, mask: Option<&GrayImage>) -> ColorResult<()> {
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

        for (x, y, px) in image.enumerate_pixels() {
            if let Some(m) = mask {
                if m.get_pixel(x, y).0[0] == 0 {
                    continue;
                }
            }
            let (i, j) = self.bin_index(self.space.sample(*px));
            self.counts[i as usize * self.bins_y as usize + j as usize] += 1.0;
        }
        Ok(())
    }

    /// Color space this histogram was built in
    pub fn space(&self) -> ColorSpace {
        self.space
    }

    /// Bin counts per axis as `(bins_x, bins_y)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.bins_x, self.bins_y)
    }

    /// Raw bin counts, row-major
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Total number of counted samples
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Count in bin `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, i: u32, j: u32) -> f64 {
        assert!(i < self.bins_x && j < self.bins_y);
        self.counts[i as usize * self.bins_y as usize + j as usize]
    }

    /// Overwrite the count in bin `(i, j)`; used when deserializing
    pub(crate) fn set_raw(&mut self, i: u32, j: u32, count: f64) {
        self.counts[i as usize * self.bins_y as usize + j as usize] = count;
    }

    /// Map a sample to its bin indices
    ///
    /// The index is `floor(value / bin_width)` relative to the axis
    /// range; a value exactly at the upper range bound lands in the
    /// last bin, never out of range.
    #[inline]
    pub fn bin_index(&self, sample: ColorSample) -> (u32, u32) {
        let [rx, ry] = self.space.ranges();
        let i = ((sample.c0 - rx.min) / (rx.span() / self.bins_x as f32)) as i64;
        let j = ((sample.c1 - ry.min) / (ry.span() / self.bins_y as f32)) as i64;
        (
            i.clamp(0, self.bins_x as i64 - 1) as u32,
            j.clamp(0, self.bins_y as i64 - 1) as u32,
        )
    }

    /// Add another histogram's counts into this one, bin by bin
    ///
    /// # Errors
    ///
    /// Mismatched dimensions or color spaces are a contract violation
    /// and fail with [`ColorError::DimensionMismatch`] /
    /// [`ColorError::SpaceMismatch`].
    pub fn merge(&mut self, other: &JointHistogram) -> ColorResult<()> {
        if other.space != self.space {
            return Err(ColorError::SpaceMismatch {
                expected: self.space,
                actual: other.space,
            });
        }
        if (other.bins_x, other.bins_y) != (self.bins_x, self.bins_y) {
            return Err(ColorError::DimensionMismatch {
                expected_x: self.bins_x,
                expected_y: self.bins_y,
                actual_x: other.bins_x,
                actual_y: other.bins_y,
            });
        }
        for (dst, src) in self.counts.iter_mut().zip(&other.counts) {
            *dst += src;
        }
        Ok(())
    }

    /// Back-project the histogram onto an image
    ///
    /// Each output pixel is the bin count of the corresponding input
    /// pixel, saturated at 255. This is a visualization aid, not a
    /// classifier.
    pub fn back_project(&self, image: &RgbImage) -> GrayImage {
        let mut out = GrayImage::new(image.width(), image.height());
        for (x, y, px) in image.enumerate_pixels() {
            let (i, j) = self.bin_index(self.space.sample(*px));
            let count = self.get(i, j);
            out.put_pixel(x, y, image::Luma([count.min(255.0) as u8]));
        }
        out
    }
}

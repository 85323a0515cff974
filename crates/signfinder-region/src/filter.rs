//! Statistical shape filtering of candidate blobs
//!
//! Street-name plates are elongated filled rectangles, which pins
//! their blob statistics into a narrow band: squareness near 0.75,
//! a wide bounding box, and a strongly elongated equivalent ellipse.
//! The filter runs three stages in order: minimum area, border
//! contact, then the shape band.

use log::debug;

use crate::blob::Blob;
use crate::error::{RegionError, RegionResult};

/// Tunable thresholds for [`ShapeFilter`]
#[derive(Debug, Clone, Copy)]
pub struct ShapeFilterParams {
    /// A blob must cover at least `1 / min_area_divisor` of the image
    pub min_area_divisor: f64,
    /// Minimum `area / (minor * major)`
    pub min_squareness: f64,
    /// Minimum bounding-box width over height
    pub min_xy_ratio: f64,
    /// Minimum major over minor ellipse axis
    pub min_axis_ratio: f64,
}

impl Default for ShapeFilterParams {
    fn default() -> Self {
        ShapeFilterParams {
            min_area_divisor: 600.0,
            min_squareness: 0.70,
            min_xy_ratio: 0.45,
            min_axis_ratio: 2.5,
        }
    }
}

/// Accepted and rejected blobs from one filter pass
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub accepted: Vec<Blob>,
    pub rejected: Vec<Blob>,
}

/// Accepts or rejects blobs by sign-plate shape statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeFilter {
    params: ShapeFilterParams,
}

impl ShapeFilter {
    pub fn new(params: ShapeFilterParams) -> Self {
        ShapeFilter { params }
    }

    pub fn params(&self) -> &ShapeFilterParams {
        &self.params
    }

    /// Partitions `blobs` into accepted and rejected candidates.
    ///
    /// `img_w` and `img_h` are the dimensions of the mask the blobs
    /// were labeled from; blobs in contact with the image border are
    /// always rejected, as are blobs smaller than the area fraction.
    pub fn run(
        &self,
        blobs: Vec<Blob>,
        img_w: u32,
        img_h: u32,
    ) -> RegionResult<FilterOutcome> {
        if img_w == 0 || img_h == 0 {
            return Err(RegionError::InvalidImageSize { width: img_w, height: img_h });
        }
        let min_area = (img_w as f64 * img_h as f64) / self.params.min_area_divisor;

        let mut outcome = FilterOutcome::default();
        for blob in blobs {
            if blob.area < min_area {
                debug!("blob {}: area {:.0} below minimum {:.0}", blob.label, blob.area, min_area);
                outcome.rejected.push(blob);
                continue;
            }
            if blob.bbox.touches_border(img_w, img_h) {
                debug!("blob {}: touches image border", blob.label);
                outcome.rejected.push(blob);
                continue;
            }

            let squareness = blob.squareness();
            let xy_ratio = blob.xy_ratio();
            let axis_ratio = blob.axis_ratio();
            debug!(
                "blob {}: area {:.0}, squareness {:.3}, x/y {:.3}, axis ratio {:.3}",
                blob.label, blob.area, squareness, xy_ratio, axis_ratio
            );
            if squareness < self.params.min_squareness
                || xy_ratio < self.params.min_xy_ratio
                || axis_ratio < self.params.min_axis_ratio
            {
                debug!("blob {}: rejected by shape", blob.label);
                outcome.rejected.push(blob);
            } else {
                debug!("blob {}: accepted", blob.label);
                outcome.accepted.push(blob);
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Connectivity, label_blobs};
    use image::GrayImage;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put_pixel(x, y, image::Luma([255]));
            }
        }
        img
    }

    #[test]
    fn test_sign_like_rectangle_is_accepted() {
        // 60x15 plate in a 200x200 image: area 900 > 40000/600.
        let mask = rect_mask(200, 200, 50, 90, 109, 104);
        let blobs = label_blobs(&mask, Connectivity::EightWay).unwrap();
        let outcome = ShapeFilter::default().run(blobs, 200, 200).unwrap();
        assert_eq!(outcome.accepted.len(), 1);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_small_blob_is_rejected() {
        let mask = rect_mask(200, 200, 50, 90, 59, 92);
        let blobs = label_blobs(&mask, Connectivity::EightWay).unwrap();
        let outcome = ShapeFilter::default().run(blobs, 200, 200).unwrap();
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn test_border_touching_blob_is_rejected() {
        // Same plate shape as the accepted case, shifted onto the edge.
        let mask = rect_mask(200, 200, 0, 90, 59, 104);
        let blobs = label_blobs(&mask, Connectivity::EightWay).unwrap();
        let outcome = ShapeFilter::default().run(blobs, 200, 200).unwrap();
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn test_square_blob_is_rejected_by_elongation() {
        // A 40x40 square passes area and squareness but not axis ratio.
        let mask = rect_mask(200, 200, 80, 80, 119, 119);
        let blobs = label_blobs(&mask, Connectivity::EightWay).unwrap();
        let outcome = ShapeFilter::default().run(blobs, 200, 200).unwrap();
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn test_tall_blob_is_rejected_by_xy_ratio() {
        // 15x60 vertical bar: elongated, but along the wrong axis.
        let mask = rect_mask(200, 200, 90, 50, 104, 109);
        let blobs = label_blobs(&mask, Connectivity::EightWay).unwrap();
        let outcome = ShapeFilter::default().run(blobs, 200, 200).unwrap();
        assert!(outcome.accepted.is_empty());
    }

    #[test]
    fn test_zero_image_size_is_an_error() {
        let outcome = ShapeFilter::default().run(Vec::new(), 0, 100);
        assert!(matches!(outcome, Err(RegionError::InvalidImageSize { .. })));
    }
}

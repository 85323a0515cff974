//! Perspective rectification of a quadrilateral sign region

use image::{Rgb, RgbImage};
use log::debug;
use nalgebra::{SMatrix, SVector};

use crate::corners::CornerSet;
use crate::error::{GeomError, GeomResult};
use crate::point::Point;

/// Homogeneous 3x3 transform as its eight free coefficients
struct Homography {
    h: [f64; 8],
}

impl Homography {
    /// Solves the 8x8 linear system mapping the four `from` points
    /// onto the four `to` points.
    fn from_correspondence(from: &[Point; 4], to: &[Point; 4]) -> GeomResult<Self> {
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for i in 0..4 {
            let (sx, sy) = (from[i].x, from[i].y);
            let (tx, ty) = (to[i].x, to[i].y);
            a[(2 * i, 0)] = sx;
            a[(2 * i, 1)] = sy;
            a[(2 * i, 2)] = 1.0;
            a[(2 * i, 6)] = -sx * tx;
            a[(2 * i, 7)] = -sy * tx;
            b[2 * i] = tx;
            a[(2 * i + 1, 3)] = sx;
            a[(2 * i + 1, 4)] = sy;
            a[(2 * i + 1, 5)] = 1.0;
            a[(2 * i + 1, 6)] = -sx * ty;
            a[(2 * i + 1, 7)] = -sy * ty;
            b[2 * i + 1] = ty;
        }
        let h = a.lu().solve(&b).ok_or(GeomError::SingularTransform)?;
        Ok(Homography { h: [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7]] })
    }

    fn apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let h = &self.h;
        let denom = h[6] * x + h[7] * y + 1.0;
        if denom.abs() < 1e-12 {
            return None;
        }
        Some((
            (h[0] * x + h[1] * y + h[2]) / denom,
            (h[3] * x + h[4] * y + h[5]) / denom,
        ))
    }
}

fn bilinear(src: &RgbImage, x: f64, y: f64) -> Option<Rgb<u8>> {
    let (w, h) = src.dimensions();
    if x < 0.0 || y < 0.0 || x > (w - 1) as f64 || y > (h - 1) as f64 {
        return None;
    }
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = src.get_pixel(x0, y0);
    let p10 = src.get_pixel(x1, y0);
    let p01 = src.get_pixel(x0, y1);
    let p11 = src.get_pixel(x1, y1);
    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Some(Rgb(out))
}

/// Warps a quadrilateral sign region to a fronto-parallel crop.
///
/// Corner order from extraction may start at any of the four physical
/// corners, so a shift in 0..4 is chosen from the relative
/// x-coordinates of opposing corners before mapping onto the target
/// rectangle. The heuristic assumes the hull walk started at either
/// the upper-left or lower-left physical corner; near-vertical
/// quadrilaterals can defeat it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rectifier;

impl Rectifier {
    pub fn new() -> Self {
        Rectifier
    }

    /// Cuts `corners` out of `src` as an upright rectangle.
    ///
    /// Target width is the bottom-edge corner distance, height the
    /// left-edge distance. The warp is applied by inverse mapping with
    /// bilinear resampling; target pixels falling outside the source
    /// stay black.
    pub fn rectify(&self, src: &RgbImage, corners: &CornerSet) -> GeomResult<RgbImage> {
        let c = corners.points();
        let shift = if c[1].x > c[3].x { 0 } else { 1 };

        let width = c[(2 + shift) % 4].dist(c[(3 + shift) % 4]).round() as u32;
        let height = c[(3 + shift) % 4].dist(c[(0 + shift) % 4]).round() as u32;
        if width == 0 || height == 0 {
            return Err(GeomError::DegenerateTarget { width, height });
        }
        debug!("rectifying to {}x{} (shift {})", width, height, shift);

        let (w, h) = (width as f64 - 1.0, height as f64 - 1.0);
        let mut targets = [Point::default(); 4];
        targets[shift] = Point::new(0.0, 0.0);
        targets[(1 + shift) % 4] = Point::new(w, 0.0);
        targets[(2 + shift) % 4] = Point::new(w, h);
        targets[(3 + shift) % 4] = Point::new(0.0, h);

        // Inverse mapping: target coordinates back into the source.
        let inverse = Homography::from_correspondence(&targets, c)?;
        let mut out = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if let Some((sx, sy)) = inverse.apply(x as f64, y as f64) {
                    if let Some(p) = bilinear(src, sx, sy) {
                        out.put_pixel(x, y, p);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Draws a yellow ring around each corner on a visualization image.
///
/// Side effect on `img` only; the rectified crop is never marked.
pub fn draw_corner_markers(img: &mut RgbImage, corners: &CornerSet) {
    let (w, h) = img.dimensions();
    for p in corners.points() {
        for dy in -6i32..=6 {
            for dx in -6i32..=6 {
                let r = ((dx * dx + dy * dy) as f64).sqrt();
                if !(4.0..=6.0).contains(&r) {
                    continue;
                }
                let x = p.x.round() as i32 + dx;
                let y = p.y.round() as i32 + dy;
                if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                    img.put_pixel(x as u32, y as u32, Rgb([255, 255, 0]));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_set(pts: [(f64, f64); 4]) -> CornerSet {
        CornerSet::new(pts.map(Point::from), 1.0).unwrap()
    }

    fn quadrant_image() -> RgbImage {
        let mut img = RgbImage::new(64, 32);
        for y in 0..32 {
            for x in 0..64 {
                img.put_pixel(x, y, Rgb([x as u8 * 2, y as u8 * 4, 100]));
            }
        }
        img
    }

    #[test]
    fn test_axis_aligned_corners_cut_the_subimage() {
        let src = quadrant_image();
        let corners = corner_set([(10.0, 5.0), (39.0, 5.0), (39.0, 19.0), (10.0, 19.0)]);
        let cut = Rectifier::new().rectify(&src, &corners).unwrap();
        assert_eq!(cut.dimensions(), (29, 14));

        // The four target corners land exactly on the source corners.
        assert_eq!(cut.get_pixel(0, 0), src.get_pixel(10, 5));
        assert_eq!(cut.get_pixel(28, 0), src.get_pixel(39, 5));
        assert_eq!(cut.get_pixel(28, 13), src.get_pixel(39, 19));
        assert_eq!(cut.get_pixel(0, 13), src.get_pixel(10, 19));
    }

    #[test]
    fn test_rotated_corner_order_cuts_the_same_rectangle() {
        let src = quadrant_image();
        let canonical = corner_set([(10.0, 5.0), (39.0, 5.0), (39.0, 19.0), (10.0, 19.0)]);
        // Same quadrilateral, walk started at the lower-left corner.
        let rotated = corner_set([(10.0, 19.0), (10.0, 5.0), (39.0, 5.0), (39.0, 19.0)]);

        let r = Rectifier::new();
        let a = r.rectify(&src, &canonical).unwrap();
        let b = r.rectify(&src, &rotated).unwrap();
        assert_eq!(a.dimensions(), b.dimensions());
        assert_eq!(a.get_pixel(0, 0), b.get_pixel(0, 0));
        assert_eq!(a.get_pixel(28, 13), b.get_pixel(28, 13));
    }

    #[test]
    fn test_skewed_quadrilateral_maps_corners_to_target_corners() {
        let mut src = RgbImage::new(80, 60);
        let corners = [(20.0, 10.0), (60.0, 14.0), (58.0, 38.0), (16.0, 34.0)];
        for &(x, y) in &corners {
            src.put_pixel(x as u32, y as u32, Rgb([255, 0, 0]));
        }
        let cut = Rectifier::new().rectify(&src, &corner_set(corners)).unwrap();
        let (w, h) = cut.dimensions();
        assert_eq!(*cut.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*cut.get_pixel(w - 1, 0), Rgb([255, 0, 0]));
        assert_eq!(*cut.get_pixel(w - 1, h - 1), Rgb([255, 0, 0]));
        assert_eq!(*cut.get_pixel(0, h - 1), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_markers_stay_inside_the_image() {
        let mut img = RgbImage::new(40, 40);
        let corners = corner_set([(1.0, 1.0), (38.0, 1.0), (38.0, 38.0), (1.0, 38.0)]);
        draw_corner_markers(&mut img, &corners);
        assert_eq!(*img.get_pixel(6, 1), Rgb([255, 255, 0]));
    }
}

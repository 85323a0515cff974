//! Minimum-eigenvalue corner detection with hull snapping
//!
//! The angle walk fails on hulls with rounded or clipped corners, so
//! the fallback detects corner features directly: Sobel gradients, a
//! box-summed structure tensor, and the smaller tensor eigenvalue as
//! the corner response. The detections are then snapped onto their own
//! convex hull so the result is a proper quadrilateral.

use image::GrayImage;
use log::debug;
use signfinder_region::convex_hull;

use crate::corners::CornerSet;
use crate::error::{GeomError, GeomResult};
use crate::point::Point;

/// Detector settings for [`corners_from_features`]
#[derive(Debug, Clone, Copy)]
pub struct FeatureParams {
    /// Responses below `quality_level * max_response` are discarded
    pub quality_level: f64,
    /// Side of the structure-tensor summation window (odd)
    pub block_size: u32,
}

impl Default for FeatureParams {
    fn default() -> Self {
        FeatureParams { quality_level: 0.1, block_size: 9 }
    }
}

/// Summed-area table over `data`, laid out `(w + 1) * (h + 1)`
struct Integral {
    sums: Vec<f64>,
    width: usize,
}

impl Integral {
    fn build(data: &[f64], w: usize, h: usize) -> Self {
        let mut sums = vec![0.0; (w + 1) * (h + 1)];
        for y in 0..h {
            let mut row = 0.0;
            for x in 0..w {
                row += data[y * w + x];
                sums[(y + 1) * (w + 1) + (x + 1)] = sums[y * (w + 1) + (x + 1)] + row;
            }
        }
        Integral { sums, width: w + 1 }
    }

    /// Sum over the half-open box `[x0, x1) x [y0, y1)`
    fn sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        self.sums[y1 * self.width + x1] + self.sums[y0 * self.width + x0]
            - self.sums[y0 * self.width + x1]
            - self.sums[y1 * self.width + x0]
    }
}

/// Detects the four strongest corner features in a binary mask.
///
/// Candidates at least `dist_thr` apart are taken in response order,
/// the candidate nearest the image origin becomes the canonical start
/// (ties: first encountered), and each candidate is snapped to its
/// nearest vertex on the candidates' convex hull. Fewer than four
/// distinct snapped corners is an error.
pub fn corners_from_features(
    mask: &GrayImage,
    dist_thr: f64,
    params: &FeatureParams,
) -> GeomResult<CornerSet> {
    let (w, h) = mask.dimensions();
    if w < 3 || h < 3 {
        return Err(GeomError::EmptyInput("mask too small for gradients"));
    }
    let (w, h) = (w as usize, h as usize);

    // Sobel gradients; the one-pixel border stays zero.
    let px = |x: usize, y: usize| mask.get_pixel(x as u32, y as u32)[0] as f64;
    let mut ixx = vec![0.0; w * h];
    let mut iyy = vec![0.0; w * h];
    let mut ixy = vec![0.0; w * h];
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let gx = (px(x + 1, y - 1) + 2.0 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2.0 * px(x - 1, y) + px(x - 1, y + 1));
            let gy = (px(x - 1, y + 1) + 2.0 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2.0 * px(x, y - 1) + px(x + 1, y - 1));
            ixx[y * w + x] = gx * gx;
            iyy[y * w + x] = gy * gy;
            ixy[y * w + x] = gx * gy;
        }
    }
    let sxx = Integral::build(&ixx, w, h);
    let syy = Integral::build(&iyy, w, h);
    let sxy = Integral::build(&ixy, w, h);

    // Minimum eigenvalue of the box-summed structure tensor.
    let half = (params.block_size / 2) as usize;
    let mut response = vec![0.0; w * h];
    let mut max_response = 0.0f64;
    for y in 0..h {
        for x in 0..w {
            let x0 = x.saturating_sub(half);
            let y0 = y.saturating_sub(half);
            let x1 = (x + half + 1).min(w);
            let y1 = (y + half + 1).min(h);
            let a = sxx.sum(x0, y0, x1, y1);
            let b = sxy.sum(x0, y0, x1, y1);
            let c = syy.sum(x0, y0, x1, y1);
            let lambda = (a + c - ((a - c).powi(2) + 4.0 * b * b).sqrt()) / 2.0;
            response[y * w + x] = lambda;
            max_response = max_response.max(lambda);
        }
    }
    if max_response <= 0.0 {
        return Err(GeomError::EmptyInput("mask has no corner response"));
    }

    // 3x3 non-maximum suppression above the quality floor.
    let floor = params.quality_level * max_response;
    let mut candidates: Vec<(f64, Point)> = Vec::new();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let r = response[y * w + x];
            if r < floor {
                continue;
            }
            let mut is_max = true;
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    if (dx, dy) == (0, 0) {
                        continue;
                    }
                    let n = response[(y as i32 + dy) as usize * w + (x as i32 + dx) as usize];
                    if n > r {
                        is_max = false;
                    }
                }
            }
            if is_max {
                candidates.push((r, Point::new(x as f64, y as f64)));
            }
        }
    }
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    // Strongest-first selection with the minimum-distance constraint.
    let mut picked: Vec<Point> = Vec::with_capacity(4);
    for &(_, p) in &candidates {
        if picked.iter().all(|q| q.dist(p) >= dist_thr) {
            picked.push(p);
            if picked.len() == 4 {
                break;
            }
        }
    }
    debug!("feature detector: {} candidates, {} picked", candidates.len(), picked.len());
    if picked.len() < 4 {
        return Err(GeomError::TooFewCorners { found: picked.len(), expected: 4 });
    }

    let ordered = snap_to_hull(picked)?;
    CornerSet::new(ordered, dist_thr)
}

/// Orders four corner candidates into a quadrilateral.
///
/// The candidate nearest the image origin becomes the canonical start
/// (ties: first encountered). Each candidate then snaps to its nearest
/// vertex of the candidates' convex hull, and the result follows the
/// hull traversal from the snapped start. Candidates that already sit
/// on their hull come back exactly, reordered but unaltered.
fn snap_to_hull(mut picked: Vec<Point>) -> GeomResult<[Point; 4]> {
    let mut start = 0;
    let mut best = f64::INFINITY;
    for (i, p) in picked.iter().enumerate() {
        let d = p.dist_to_origin();
        if d < best {
            best = d;
            start = i;
        }
    }
    picked.rotate_left(start);

    // An interior candidate collapses onto an already claimed vertex
    // and fails the distinctness check.
    let hull = convex_hull(&picked.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>());
    let snap = |p: Point| -> Point {
        let mut best = Point::from(hull[0]);
        for &v in &hull {
            if Point::from(v).dist(p) < best.dist(p) {
                best = v.into();
            }
        }
        best
    };
    let snapped: Vec<Point> = picked.iter().map(|&p| snap(p)).collect();
    for i in 0..snapped.len() {
        for j in i + 1..snapped.len() {
            if snapped[i] == snapped[j] {
                return Err(GeomError::TooFewCorners { found: 3, expected: 4 });
            }
        }
    }

    // Order by hull traversal, rotated so the canonical start stays
    // first.
    let mut ordered: Vec<Point> = hull
        .iter()
        .map(|&v| Point::from(v))
        .filter(|v| snapped.contains(v))
        .collect();
    if let Some(pos) = ordered.iter().position(|&v| v == snapped[0]) {
        ordered.rotate_left(pos);
    }
    Ok([ordered[0], ordered[1], ordered[2], ordered[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use signfinder_region::fill_convex_hull;

    #[test]
    fn test_filled_rectangle_corners() {
        let hull = vec![(12.0, 8.0), (51.0, 8.0), (51.0, 23.0), (12.0, 23.0)];
        let mask = fill_convex_hull(64, 32, &hull);
        let set = corners_from_features(&mask, 8.0, &FeatureParams::default()).unwrap();

        // Each detected corner lies within a couple of pixels of a
        // true rectangle corner, and all four are claimed.
        let truth = [(12.0, 8.0), (51.0, 8.0), (51.0, 23.0), (12.0, 23.0)];
        for &(tx, ty) in &truth {
            let t = Point::new(tx, ty);
            assert!(
                (0..4).any(|i| set[i].dist(t) <= 3.0),
                "no detection near ({tx},{ty}): {set:?}"
            );
        }
    }

    #[test]
    fn test_first_corner_is_nearest_origin() {
        let hull = vec![(12.0, 8.0), (51.0, 8.0), (51.0, 23.0), (12.0, 23.0)];
        let mask = fill_convex_hull(64, 32, &hull);
        let set = corners_from_features(&mask, 8.0, &FeatureParams::default()).unwrap();
        let d0 = set[0].dist_to_origin();
        for i in 1..4 {
            assert!(set[i].dist_to_origin() >= d0);
        }
    }

    #[test]
    fn test_skewed_quadrilateral_corners() {
        let hull = vec![(18.0, 6.0), (55.0, 10.0), (52.0, 26.0), (14.0, 21.0)];
        let mask = fill_convex_hull(70, 36, &hull);
        let set = corners_from_features(&mask, 10.0, &FeatureParams::default()).unwrap();
        for &(tx, ty) in &[(18.0, 6.0), (55.0, 10.0), (52.0, 26.0), (14.0, 21.0)] {
            let t = Point::new(tx, ty);
            assert!(
                (0..4).any(|i| set[i].dist(t) <= 4.0),
                "no detection near ({tx},{ty}): {set:?}"
            );
        }
    }

    fn points(pts: [(f64, f64); 4]) -> Vec<Point> {
        pts.map(Point::from).to_vec()
    }

    #[test]
    fn test_snap_keeps_exact_vertices_in_hull_order() {
        // Scrambled rectangle corners: the snap must return them
        // exactly, reordered along the hull from the nearest-origin
        // corner.
        let picked = points([(51.0, 23.0), (12.0, 8.0), (12.0, 23.0), (51.0, 8.0)]);
        let ordered = snap_to_hull(picked).unwrap();
        assert_eq!(
            ordered,
            [
                Point::new(12.0, 8.0),
                Point::new(51.0, 8.0),
                Point::new(51.0, 23.0),
                Point::new(12.0, 23.0),
            ]
        );
    }

    #[test]
    fn test_snap_keeps_exact_skewed_vertices() {
        let picked = points([(55.0, 10.0), (14.0, 21.0), (18.0, 6.0), (52.0, 26.0)]);
        let ordered = snap_to_hull(picked).unwrap();
        assert_eq!(
            ordered,
            [
                Point::new(18.0, 6.0),
                Point::new(55.0, 10.0),
                Point::new(52.0, 26.0),
                Point::new(14.0, 21.0),
            ]
        );
    }

    #[test]
    fn test_interior_candidate_collapses_on_snap() {
        // The fourth candidate lies inside the other three's triangle,
        // so it snaps onto a claimed vertex.
        let picked = points([(12.0, 8.0), (51.0, 8.0), (51.0, 23.0), (40.0, 12.0)]);
        assert!(matches!(
            snap_to_hull(picked),
            Err(GeomError::TooFewCorners { found: 3, expected: 4 })
        ));
    }

    #[test]
    fn test_tiny_mask_is_an_error() {
        let mask = GrayImage::new(2, 2);
        assert!(matches!(
            corners_from_features(&mask, 5.0, &FeatureParams::default()),
            Err(GeomError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_blank_mask_has_no_response() {
        let mask = GrayImage::new(32, 32);
        assert!(corners_from_features(&mask, 5.0, &FeatureParams::default()).is_err());
    }
}

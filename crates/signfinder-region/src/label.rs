//! Connected-component labeling
//!
//! Classic two-pass labeling with a union-find over provisional
//! labels. The second pass resolves equivalences and accumulates the
//! per-component statistics that become [`Blob`] records: area,
//! bounding box, central moments for the equivalent ellipse, and the
//! per-row extremes that feed the convex hull.

use image::GrayImage;

use crate::blob::{Blob, BoundingBox};
use crate::error::{RegionError, RegionResult};
use crate::hull::convex_hull;

/// Pixel adjacency used when labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Edge neighbors only
    FourWay,
    /// Edge and corner neighbors
    #[default]
    EightWay,
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // Slot 0 is the background pseudo-label.
        UnionFind { parent: vec![0] }
    }

    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Running statistics for one component during the second pass
struct Accumulator {
    count: u64,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    sum_x: f64,
    sum_y: f64,
    sum_xx: f64,
    sum_yy: f64,
    sum_xy: f64,
    /// (y, leftmost x, rightmost x) per occupied row, in scan order
    rows: Vec<(u32, u32, u32)>,
}

impl Accumulator {
    fn new(x: u32, y: u32) -> Self {
        Accumulator {
            count: 0,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            sum_x: 0.0,
            sum_y: 0.0,
            sum_xx: 0.0,
            sum_yy: 0.0,
            sum_xy: 0.0,
            rows: Vec::new(),
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.count += 1;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        let (xf, yf) = (x as f64, y as f64);
        self.sum_x += xf;
        self.sum_y += yf;
        self.sum_xx += xf * xf;
        self.sum_yy += yf * yf;
        self.sum_xy += xf * yf;
        match self.rows.last_mut() {
            Some(row) if row.0 == y => row.2 = x,
            _ => self.rows.push((y, x, x)),
        }
    }

    fn into_blob(self, label: u32) -> Blob {
        let n = self.count as f64;
        let cx = self.sum_x / n;
        let cy = self.sum_y / n;
        // Central moments with the 1/12 unit-square pixel correction,
        // so single-pixel rows and columns keep a nonzero extent.
        let mu20 = self.sum_xx / n - cx * cx + 1.0 / 12.0;
        let mu02 = self.sum_yy / n - cy * cy + 1.0 / 12.0;
        let mu11 = self.sum_xy / n - cx * cy;

        let common = ((mu20 - mu02).powi(2) + 4.0 * mu11 * mu11).sqrt();
        let lambda_max = (mu20 + mu02 + common) / 2.0;
        let lambda_min = (mu20 + mu02 - common) / 2.0;
        let major_axis = 4.0 * lambda_max.max(0.0).sqrt();
        let minor_axis = 4.0 * lambda_min.max(0.0).sqrt();
        let orientation = 0.5 * (2.0 * mu11).atan2(mu20 - mu02);

        let mut boundary = Vec::with_capacity(self.rows.len() * 2);
        for &(y, left, right) in &self.rows {
            boundary.push((left as f64, y as f64));
            if right != left {
                boundary.push((right as f64, y as f64));
            }
        }

        Blob {
            label,
            area: n,
            bbox: BoundingBox {
                min_x: self.min_x,
                min_y: self.min_y,
                max_x: self.max_x,
                max_y: self.max_y,
            },
            centroid: (cx, cy),
            major_axis,
            minor_axis,
            orientation,
            hull: convex_hull(&boundary),
        }
    }
}

/// Labels the connected foreground components of a binary mask.
///
/// Any nonzero pixel is foreground. Returns one [`Blob`] per component
/// with 1-based labels assigned in scan order.
pub fn label_blobs(mask: &GrayImage, connectivity: Connectivity) -> RegionResult<Vec<Blob>> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return Err(RegionError::EmptyMask { width, height });
    }

    let mut uf = UnionFind::new();
    let mut labels = vec![0u32; (width * height) as usize];
    let idx = |x: u32, y: u32| (y * width + x) as usize;

    // First pass: provisional labels from the already-visited
    // neighbors (west, and the row above).
    for y in 0..height {
        for x in 0..width {
            if mask.get_pixel(x, y)[0] == 0 {
                continue;
            }
            let mut neighbors = [0u32; 4];
            let mut n = 0;
            if x > 0 {
                neighbors[n] = labels[idx(x - 1, y)];
                n += 1;
            }
            if y > 0 {
                neighbors[n] = labels[idx(x, y - 1)];
                n += 1;
                if connectivity == Connectivity::EightWay {
                    if x > 0 {
                        neighbors[n] = labels[idx(x - 1, y - 1)];
                        n += 1;
                    }
                    if x + 1 < width {
                        neighbors[n] = labels[idx(x + 1, y - 1)];
                        n += 1;
                    }
                }
            }

            let mut assigned = 0;
            for &nb in &neighbors[..n] {
                if nb != 0 {
                    if assigned == 0 {
                        assigned = nb;
                    } else {
                        uf.union(assigned, nb);
                    }
                }
            }
            if assigned == 0 {
                assigned = uf.make_set();
            }
            labels[idx(x, y)] = assigned;
        }
    }

    // Second pass: resolve roots, compact labels, accumulate stats.
    let mut compact: Vec<u32> = vec![0; uf.parent.len()];
    let mut accums: Vec<Accumulator> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let provisional = labels[idx(x, y)];
            if provisional == 0 {
                continue;
            }
            let root = uf.find(provisional);
            let slot = if compact[root as usize] == 0 {
                accums.push(Accumulator::new(x, y));
                compact[root as usize] = accums.len() as u32;
                accums.len() - 1
            } else {
                (compact[root as usize] - 1) as usize
            };
            accums[slot].add(x, y);
        }
    }

    Ok(accums
        .into_iter()
        .enumerate()
        .map(|(i, acc)| acc.into_blob(i as u32 + 1))
        .collect())
}

/// Rasterizes the filled convex hull of a blob into a fresh mask.
///
/// Inside pixels are 255, the rest 0. Vertices outside the image are
/// clipped by the fill loop.
pub fn fill_convex_hull(width: u32, height: u32, hull: &[(f64, f64)]) -> GrayImage {
    let mut out = GrayImage::new(width, height);
    if hull.is_empty() {
        return out;
    }

    let y_min = hull.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let y_max = hull.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let y_lo = (y_min - 1e-9).ceil().max(0.0) as u32;
    let y_hi = ((y_max + 1e-9).floor() as i64).min(height as i64 - 1);
    if y_hi < 0 {
        return out;
    }

    for y in y_lo..=y_hi as u32 {
        let yf = y as f64;
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        for i in 0..hull.len() {
            let (x0, y0) = hull[i];
            let (x1, y1) = hull[(i + 1) % hull.len()];
            if (y0 - y1).abs() < 1e-12 {
                if (y0 - yf).abs() < 1e-9 {
                    x_min = x_min.min(x0.min(x1));
                    x_max = x_max.max(x0.max(x1));
                }
                continue;
            }
            if yf < y0.min(y1) - 1e-9 || yf > y0.max(y1) + 1e-9 {
                continue;
            }
            let t = (yf - y0) / (y1 - y0);
            let x = x0 + t * (x1 - x0);
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
        if x_min > x_max {
            continue;
        }
        let x_lo = (x_min - 1e-9).ceil().max(0.0) as u32;
        let x_hi = ((x_max + 1e-9).floor() as i64).min(width as i64 - 1);
        if x_hi < 0 {
            continue;
        }
        for x in x_lo..=x_hi as u32 {
            out.put_pixel(x, y, image::Luma([255]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&[u8]]) -> GrayImage {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut img = GrayImage::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                img.put_pixel(x as u32, y as u32, image::Luma([if v != 0 { 255 } else { 0 }]));
            }
        }
        img
    }

    #[test]
    fn test_empty_mask_is_an_error() {
        let img = GrayImage::new(0, 5);
        assert!(matches!(
            label_blobs(&img, Connectivity::EightWay),
            Err(RegionError::EmptyMask { .. })
        ));
    }

    #[test]
    fn test_all_background_yields_no_blobs() {
        let img = GrayImage::new(8, 8);
        let blobs = label_blobs(&img, Connectivity::EightWay).unwrap();
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_two_separate_components() {
        let img = mask_from_rows(&[
            &[1, 1, 0, 0, 0],
            &[1, 1, 0, 0, 0],
            &[0, 0, 0, 1, 1],
            &[0, 0, 0, 1, 1],
        ]);
        let blobs = label_blobs(&img, Connectivity::EightWay).unwrap();
        assert_eq!(blobs.len(), 2);
        assert_eq!(blobs[0].label, 1);
        assert_eq!(blobs[1].label, 2);
        assert_eq!(blobs[0].area, 4.0);
        assert_eq!(blobs[1].area, 4.0);
        assert_eq!(
            blobs[1].bbox,
            BoundingBox { min_x: 3, min_y: 2, max_x: 4, max_y: 3 }
        );
    }

    #[test]
    fn test_diagonal_touch_depends_on_connectivity() {
        let img = mask_from_rows(&[&[1, 0], &[0, 1]]);
        let four = label_blobs(&img, Connectivity::FourWay).unwrap();
        assert_eq!(four.len(), 2);
        let eight = label_blobs(&img, Connectivity::EightWay).unwrap();
        assert_eq!(eight.len(), 1);
    }

    #[test]
    fn test_u_shape_merges_into_one_component() {
        // The two arms get distinct provisional labels and merge at
        // the bottom row.
        let img = mask_from_rows(&[
            &[1, 0, 1],
            &[1, 0, 1],
            &[1, 1, 1],
        ]);
        let blobs = label_blobs(&img, Connectivity::FourWay).unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].area, 7.0);
    }

    #[test]
    fn test_rectangle_statistics() {
        let mut img = GrayImage::new(40, 30);
        for y in 5..15 {
            for x in 4..34 {
                img.put_pixel(x, y, image::Luma([255]));
            }
        }
        let blobs = label_blobs(&img, Connectivity::EightWay).unwrap();
        assert_eq!(blobs.len(), 1);
        let b = &blobs[0];
        assert_eq!(b.area, 300.0);
        assert_eq!(b.bbox, BoundingBox { min_x: 4, min_y: 5, max_x: 33, max_y: 14 });
        assert!((b.centroid.0 - 18.5).abs() < 1e-9);
        assert!((b.centroid.1 - 9.5).abs() < 1e-9);
        // 30x10 rectangle: equivalent-ellipse axes 2w/sqrt(3), 2h/sqrt(3).
        assert!((b.major_axis - 60.0 / 3.0_f64.sqrt()).abs() < 1e-6);
        assert!((b.minor_axis - 20.0 / 3.0_f64.sqrt()).abs() < 1e-6);
        assert!((b.squareness() - 0.75).abs() < 1e-6);
        assert!((b.axis_ratio() - 3.0).abs() < 1e-6);
        assert!(b.orientation.abs() < 1e-9);
        assert_eq!(b.hull.len(), 4);
    }

    #[test]
    fn test_single_pixel_blob_has_nonzero_axes() {
        let img = mask_from_rows(&[&[0, 0], &[0, 1]]);
        let blobs = label_blobs(&img, Connectivity::EightWay).unwrap();
        assert_eq!(blobs.len(), 1);
        assert!(blobs[0].major_axis > 0.0);
        assert!(blobs[0].minor_axis > 0.0);
    }

    #[test]
    fn test_fill_convex_hull_reproduces_rectangle() {
        let mut img = GrayImage::new(20, 20);
        for y in 3..9 {
            for x in 5..15 {
                img.put_pixel(x, y, image::Luma([255]));
            }
        }
        let blobs = label_blobs(&img, Connectivity::EightWay).unwrap();
        let filled = fill_convex_hull(20, 20, &blobs[0].hull);
        for y in 0..20 {
            for x in 0..20 {
                assert_eq!(filled.get_pixel(x, y)[0], img.get_pixel(x, y)[0], "at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_fill_convex_hull_clips_to_image() {
        let hull = vec![(-5.0, -5.0), (25.0, -5.0), (25.0, 25.0), (-5.0, 25.0)];
        let filled = fill_convex_hull(10, 10, &hull);
        assert!(filled.pixels().all(|p| p[0] == 255));
    }
}

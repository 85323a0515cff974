//! Corner sets and the angle-deviation extractor

use std::f64::consts::PI;

use log::debug;

use crate::error::{GeomError, GeomResult};
use crate::point::Point;

/// Exactly four ordered quadrilateral corners.
///
/// The order follows the convex hull the corners were extracted from,
/// starting at (or near) the corner closest to the image origin.
/// Construction rejects adjacent corners closer than the minimum
/// separation, which also covers coincident points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSet {
    points: [Point; 4],
}

impl CornerSet {
    pub fn new(points: [Point; 4], min_separation: f64) -> GeomResult<Self> {
        for i in 0..4 {
            let j = (i + 1) % 4;
            let dist = points[i].dist(points[j]);
            if dist < min_separation {
                return Err(GeomError::CornersTooClose { a: i, b: j, dist, min: min_separation });
            }
        }
        Ok(CornerSet { points })
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }
}

impl std::ops::Index<usize> for CornerSet {
    type Output = Point;

    fn index(&self, i: usize) -> &Point {
        &self.points[i]
    }
}

/// Thresholds for [`corners_from_hull`]
#[derive(Debug, Clone, Copy)]
pub struct AngleParams {
    /// Minimum edge-direction change to count as a corner (radians)
    pub angle_thr: f64,
    /// Minimum distance from the previously recorded corner
    pub dist_thr: f64,
}

impl AngleParams {
    pub fn new(dist_thr: f64) -> Self {
        AngleParams { angle_thr: PI / 8.0, dist_thr }
    }
}

/// Direction of the edge from `a` to `b`, folded into (-pi/2, pi/2).
///
/// The fold means opposite edge directions compare equal; sharp
/// quadrilateral turns still register, near-vertical edge pairs can
/// produce spuriously large deltas.
fn edge_direction(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0) / (a.1 - b.1)).atan()
}

/// Extracts quadrilateral corners by walking the convex hull.
///
/// A hull vertex is a corner when the direction change between its
/// incoming and outgoing edges exceeds `angle_thr` and it lies more
/// than `dist_thr` from the previously recorded corner. More than four
/// corners is a hard error; so is fewer, since the rectifier needs a
/// quadrilateral.
pub fn corners_from_hull(hull: &[(f64, f64)], params: &AngleParams) -> GeomResult<CornerSet> {
    if hull.len() < 3 {
        return Err(GeomError::EmptyInput("hull has fewer than 3 vertices"));
    }

    let n = hull.len();
    let mut corners: Vec<Point> = Vec::with_capacity(4);
    let mut prev_corner: Option<Point> = None;

    for i in 0..n {
        let before = hull[(i + n - 1) % n];
        let here = hull[i];
        let after = hull[(i + 1) % n];
        let delta = (edge_direction(here, after) - edge_direction(before, here)).abs();
        if delta <= params.angle_thr {
            continue;
        }
        let vertex = Point::from(here);
        if let Some(prev) = prev_corner {
            if vertex.dist(prev) <= params.dist_thr {
                continue;
            }
        }
        debug!("corner {} at ({:.0},{:.0}), turn {:.3} rad", corners.len(), vertex.x, vertex.y, delta);
        if corners.len() == 4 {
            return Err(GeomError::TooManyCorners { found: 5, expected: 4 });
        }
        corners.push(vertex);
        prev_corner = Some(vertex);
    }

    if corners.len() < 4 {
        return Err(GeomError::TooFewCorners { found: corners.len(), expected: 4 });
    }
    CornerSet::new([corners[0], corners[1], corners[2], corners[3]], params.dist_thr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_hull() -> Vec<(f64, f64)> {
        vec![(10.0, 5.0), (49.0, 5.0), (49.0, 19.0), (10.0, 19.0)]
    }

    #[test]
    fn test_rectangle_yields_four_corners_in_hull_order() {
        let set = corners_from_hull(&rect_hull(), &AngleParams::new(5.0)).unwrap();
        assert_eq!(set[0], Point::new(10.0, 5.0));
        assert_eq!(set[1], Point::new(49.0, 5.0));
        assert_eq!(set[2], Point::new(49.0, 19.0));
        assert_eq!(set[3], Point::new(10.0, 19.0));
    }

    #[test]
    fn test_shallow_bend_is_not_a_corner() {
        // Left edge bulges out by one pixel over its 14px height: the
        // turn at the bulge stays far below pi/8.
        let hull = vec![
            (9.0, 12.0),
            (10.0, 5.0),
            (49.0, 5.0),
            (49.0, 19.0),
            (10.0, 19.0),
        ];
        let set = corners_from_hull(&hull, &AngleParams::new(5.0)).unwrap();
        assert_eq!(set[0], Point::new(10.0, 5.0));
        assert_eq!(set[3], Point::new(10.0, 19.0));
    }

    #[test]
    fn test_five_sharp_corners_is_an_error() {
        // Regular pentagon, radius 50.
        let hull: Vec<(f64, f64)> = (0..5)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / 5.0;
                (100.0 + 50.0 * a.cos(), 100.0 + 50.0 * a.sin())
            })
            .collect();
        let result = corners_from_hull(&hull, &AngleParams::new(5.0));
        assert!(matches!(result, Err(GeomError::TooManyCorners { .. })));
    }

    #[test]
    fn test_distance_threshold_suppresses_close_corner() {
        // A clipped rectangle corner: two sharp turns 5.7px apart.
        // With dist_thr above that, only the first of the pair is
        // recorded and the quadrilateral still comes out.
        let hull = vec![
            (10.0, 5.0),
            (49.0, 5.0),
            (49.0, 15.0),
            (45.0, 19.0),
            (10.0, 19.0),
        ];
        let set = corners_from_hull(&hull, &AngleParams::new(8.0)).unwrap();
        assert_eq!(set[2], Point::new(49.0, 15.0));
        assert_eq!(set[3], Point::new(10.0, 19.0));
    }

    #[test]
    fn test_corner_set_rejects_close_pairs() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(50.0, 30.0),
            Point::new(0.0, 30.0),
        ];
        assert!(matches!(
            CornerSet::new(pts, 5.0),
            Err(GeomError::CornersTooClose { a: 0, b: 1, .. })
        ));
    }
}

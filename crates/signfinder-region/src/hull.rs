//! Convex hull (Andrew's monotone chain)

/// Cross product of (a - o) x (b - o)
fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Computes the convex hull of a point set.
///
/// Vertices are returned counter-clockwise in a y-up frame (clockwise
/// as drawn with the image y-axis pointing down), starting at the
/// lexicographically smallest point. Collinear points on the hull
/// boundary are dropped. Inputs of fewer than three points are
/// returned as-is (deduplicated and sorted).
pub fn convex_hull(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut pts: Vec<(f64, f64)> = points.to_vec();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<(f64, f64)> = Vec::with_capacity(pts.len() + 1);

    // Lower chain
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper chain
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }

    // The start point is repeated as the last element
    hull.pop();
    hull
}

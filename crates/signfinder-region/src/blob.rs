//! Blob records
//!
//! A [`Blob`] is one connected foreground component of a classifier
//! mask together with the statistics the shape filter and corner
//! extraction need. Blobs are produced by [`crate::label_blobs`] and
//! consumed read-only; their lifetime is one image's classification
//! pass.

/// Inclusive pixel bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// Box width in pixels
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Box height in pixels
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// True if the box touches any edge of an `img_w` x `img_h` image
    pub fn touches_border(&self, img_w: u32, img_h: u32) -> bool {
        self.min_x == 0 || self.min_y == 0 || self.max_x == img_w - 1 || self.max_y == img_h - 1
    }
}

/// A connected component with shape statistics
///
/// Axis lengths and orientation come from the ellipse with the same
/// second central moments as the component. The convex hull is ordered
/// counter-clockwise in a y-up frame (clockwise as drawn with the
/// image y-axis pointing down), starting at the lexicographically
/// smallest vertex, and is implicitly closed.
#[derive(Debug, Clone)]
pub struct Blob {
    /// Component label assigned by the labeler (1-based)
    pub label: u32,
    /// Foreground pixel count
    pub area: f64,
    /// Inclusive bounding box
    pub bbox: BoundingBox,
    /// Centroid (x, y)
    pub centroid: (f64, f64),
    /// Major axis length of the moment-equivalent ellipse
    pub major_axis: f64,
    /// Minor axis length of the moment-equivalent ellipse
    pub minor_axis: f64,
    /// Ellipse orientation in radians, measured from the x-axis
    pub orientation: f64,
    /// Convex hull vertices
    pub hull: Vec<(f64, f64)>,
}

impl Blob {
    /// `area / (minor * major)`: 1.0 for an ideal ellipse-filling
    /// region, ~0.75 for a filled axis-aligned rectangle
    pub fn squareness(&self) -> f64 {
        self.area / (self.minor_axis * self.major_axis)
    }

    /// Bounding-box width over height; > 1 means wider than tall
    pub fn xy_ratio(&self) -> f64 {
        (self.bbox.max_x - self.bbox.min_x) as f64 / (self.bbox.max_y - self.bbox.min_y) as f64
    }

    /// Major over minor ellipse axis length (elongation)
    pub fn axis_ratio(&self) -> f64 {
        self.major_axis / self.minor_axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_dimensions() {
        let b = BoundingBox {
            min_x: 2,
            min_y: 3,
            max_x: 11,
            max_y: 7,
        };
        assert_eq!(b.width(), 10);
        assert_eq!(b.height(), 5);
    }

    #[test]
    fn test_touches_border() {
        let inner = BoundingBox {
            min_x: 1,
            min_y: 1,
            max_x: 98,
            max_y: 98,
        };
        assert!(!inner.touches_border(100, 100));

        for b in [
            BoundingBox { min_x: 0, min_y: 5, max_x: 10, max_y: 10 },
            BoundingBox { min_x: 5, min_y: 0, max_x: 10, max_y: 10 },
            BoundingBox { min_x: 5, min_y: 5, max_x: 99, max_y: 10 },
            BoundingBox { min_x: 5, min_y: 5, max_x: 10, max_y: 99 },
        ] {
            assert!(b.touches_border(100, 100));
        }
    }
}

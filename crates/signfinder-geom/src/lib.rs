//! signfinder-geom - Corner extraction and perspective rectification
//!
//! Takes an accepted sign candidate from its convex hull to a
//! fronto-parallel crop:
//!
//! - [`corners_from_hull`] walks the hull and records vertices where
//!   the edge direction turns sharply
//! - [`corners_from_features`] runs a minimum-eigenvalue corner
//!   detector over a filled hull mask and snaps the detections back
//!   onto the hull
//! - [`Rectifier`] maps the four corners onto an upright rectangle
//!   with a projective transform and resamples the source into it
//!
//! Both extractors produce a [`CornerSet`], a validated quadrilateral
//! whose winding starts at the corner nearest the image origin.

mod corners;
mod error;
mod features;
mod point;
mod rectify;

pub use corners::{AngleParams, CornerSet, corners_from_hull};
pub use error::{GeomError, GeomResult};
pub use features::{FeatureParams, corners_from_features};
pub use point::Point;
pub use rectify::{Rectifier, draw_corner_markers};

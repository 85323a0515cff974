//! signfinder-region - Blob extraction and shape filtering
//!
//! Turns a binary classifier mask into candidate sign regions:
//!
//! - [`label_blobs`] finds connected foreground components and derives
//!   per-blob statistics (area, bounding box, fitted-ellipse axes,
//!   convex hull)
//! - [`ShapeFilter`] accepts or rejects blobs by the shape statistics
//!   typical of rectangular street signs
//!
//! Downstream code treats [`Blob`] as a read-only record scoped to one
//! image's classification pass.

mod blob;
mod error;
mod filter;
mod hull;
mod label;

pub use blob::{Blob, BoundingBox};
pub use error::{RegionError, RegionResult};
pub use filter::{FilterOutcome, ShapeFilter, ShapeFilterParams};
pub use hull::convex_hull;
pub use label::{Connectivity, fill_convex_hull, label_blobs};

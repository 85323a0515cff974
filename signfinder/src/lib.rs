//! SignFinder - reading Dutch street-name signs from photographs
//!
//! The pipeline finds the blue street-name plates in a photograph,
//! cuts them out fronto-parallel, and reads them:
//!
//! 1. Bayesian color classification against trained sign/background
//!    histograms produces a foreground mask
//! 2. connected components of the mask are filtered by the shape
//!    statistics of rectangular plates
//! 3. each surviving candidate's corners are extracted and the
//!    quadrilateral is rectified by a projective warp
//! 4. the crop is OCR'd and the reading is post-corrected
//!
//! When hand-labeled ground truth sits next to an input image, the run
//! also scores itself and aggregates [`RunStatistics`].
//!
//! # Example
//!
//! ```no_run
//! use signfinder::{SignFinder, SignFinderConfig};
//!
//! let config = SignFinderConfig::new("posHist.hist", "negHist.hist");
//! let finder = SignFinder::with_tesseract(config)?;
//! let mut stats = signfinder::RunStatistics::default();
//! let report = finder.process_file("street.jpg".as_ref(), &mut stats)?;
//! for sign in &report.signs {
//!     println!("read: {}", sign.text);
//! }
//! # Ok::<(), signfinder::SignFinderError>(())
//! ```

mod config;
mod error;
mod pipeline;

pub use config::SignFinderConfig;
pub use error::{SignFinderError, SignFinderResult};
pub use pipeline::{CancelToken, ImageReport, SignFinder, SignReading};

// Re-export domain crates as modules.
pub use signfinder_color as color;
pub use signfinder_eval as eval;
pub use signfinder_geom as geom;
pub use signfinder_region as region;
pub use signfinder_text as text;

// The types most callers touch directly.
pub use signfinder_color::{BayesClassifier, ColorSpace, JointHistogram};
pub use signfinder_eval::RunStatistics;
pub use signfinder_text::OcrEngine;

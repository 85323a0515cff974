//! signfinder-color - Color statistics for sign detection
//!
//! This crate provides the color side of the sign-detection pipeline:
//!
//! - Per-pixel conversion into the color spaces used for training
//!   ([`ColorSpace`])
//! - Two-dimensional joint-channel histograms with merge and
//!   persistence support ([`JointHistogram`])
//! - Bayesian per-pixel classification of an image into a binary
//!   foreground mask using a positive and a negative color model
//!   ([`BayesClassifier`])
//!
//! The classifier output is a `GrayImage` mask with foreground pixels
//! set to 255 and background pixels set to 0, ready for
//! connected-component labeling.

mod bayes;
mod colorspace;
mod error;
mod histogram;
mod serial;

pub use bayes::{BayesClassifier, DEFAULT_RATIO_THRESHOLD};
pub use colorspace::{ChannelRange, ColorSample, ColorSpace};
pub use error::{ColorError, ColorResult};
pub use histogram::JointHistogram;

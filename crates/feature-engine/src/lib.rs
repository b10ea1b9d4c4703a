//! Feature Engineering Engine
//!
//! Reduces 6-axis IMU samples to the two rotation-invariant magnitude
//! features consumed by the fall classifier, and provides the corpus
//! statistics used when deriving labels.

mod features;
mod statistics;

pub use features::{design_matrix, FeatureExtractor, FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
pub use statistics::{percentile, ClassCounts};

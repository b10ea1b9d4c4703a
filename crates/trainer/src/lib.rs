//! Fall Classifier Trainer
//!
//! Splits labelled magnitude features into train and test subsets, fits a
//! binary logistic decision function and evaluates it on the held-out part.

mod logistic;
mod metrics;
mod split;

pub use logistic::{sigmoid, LogisticModel, LogisticRegression, DEFAULT_CUTOFF};
pub use metrics::{ClassMetrics, ClassificationReport};
pub use split::{select, train_test_split, Split, MIN_STRATUM};

use feature_engine::{design_matrix, ClassCounts, FeatureVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Errors during training
#[derive(Debug, Clone, Error)]
pub enum TrainerError {
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Training set contains only class {0}")]
    SingleClass(u8),
    #[error("Shape mismatch: {rows}x{cols} features for {labels} labels")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        labels: usize,
    },
    #[error("Hessian is singular")]
    Singular,
    #[error("Non-finite value in training data or solver state")]
    NonFinite,
}

/// Trainer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Share of samples held out for evaluation
    pub test_fraction: f64,
    /// Split seed
    pub seed: u64,
    /// Solver iteration budget
    pub max_iter: usize,
    /// Solver gradient tolerance
    pub tolerance: f64,
    /// L2 penalty on the weights
    pub l2_penalty: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            seed: 42,
            max_iter: 500,
            tolerance: 1e-8,
            l2_penalty: 1.0,
        }
    }
}

/// Result of one training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: LogisticModel,
    /// Held-out evaluation, diagnostic only
    pub report: ClassificationReport,
    pub test_accuracy: f64,
    pub train_size: usize,
    pub test_size: usize,
    pub stratified: bool,
}

/// Fits the fall classifier
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Create a trainer with the given configuration
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Split, fit and evaluate
    pub fn train(&self, features: &[FeatureVector], labels: &[u8]) -> Result<TrainingOutcome, TrainerError> {
        if features.len() != labels.len() {
            return Err(TrainerError::ShapeMismatch {
                rows: features.len(),
                cols: feature_engine::FEATURE_DIMENSION,
                labels: labels.len(),
            });
        }

        let split = train_test_split(labels, self.config.test_fraction, self.config.seed);

        let train_x = select(features, &split.train);
        let train_y = select(labels, &split.train);
        let test_x = select(features, &split.test);
        let test_y = select(labels, &split.test);

        let counts = ClassCounts::from_labels(&train_y);
        info!(
            "Training on {} samples ({} normal, {} fall), holding out {}",
            train_y.len(),
            counts.negative,
            counts.positive,
            test_y.len()
        );

        let solver = LogisticRegression {
            max_iter: self.config.max_iter,
            tolerance: self.config.tolerance,
            l2_penalty: self.config.l2_penalty,
        };
        let model = solver.fit(design_matrix(&train_x).view(), &train_y)?;

        if test_y.is_empty() {
            warn!("Test subset is empty, evaluation report carries no samples");
        }
        let report = ClassificationReport::compute(&test_y, &model.predict(&test_x));
        info!(
            "Held-out accuracy {:.3} on {} samples",
            report.accuracy,
            test_y.len()
        );

        Ok(TrainingOutcome {
            test_accuracy: report.accuracy,
            model,
            report,
            train_size: split.train.len(),
            test_size: split.test.len(),
            stratified: split.stratified,
        })
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainerConfig::default())
    }
}

//! Portable Model Record

use feature_engine::{FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use trainer::{sigmoid, LogisticModel};

use crate::ExportError;

/// Decision-function family discriminator
pub const MODEL_TYPE: &str = "logistic_regression";

/// Fall probability above which an alert is raised
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Flat weight record. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallModel {
    #[serde(rename = "type")]
    pub model_type: String,
    /// Names of the scalars each weight multiplies
    pub features: Vec<String>,
    /// Same length and order as `features`
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Probability cutoff in [0, 1]
    pub threshold: f64,
}

impl FallModel {
    /// Build the record from fitted coefficients
    pub fn from_fitted(model: &LogisticModel, threshold: f64) -> Self {
        Self {
            model_type: MODEL_TYPE.to_string(),
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            weights: model.weights.to_vec(),
            bias: model.bias,
            threshold,
        }
    }

    /// Check the record against the fixed schema
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.model_type != MODEL_TYPE {
            return Err(ExportError::Schema(format!(
                "unsupported model type {:?}",
                self.model_type
            )));
        }
        if self.features != FEATURE_NAMES {
            return Err(ExportError::Schema(format!(
                "expected features {:?}, got {:?}",
                FEATURE_NAMES, self.features
            )));
        }
        if self.weights.len() != FEATURE_DIMENSION {
            return Err(ExportError::Schema(format!(
                "expected {} weights, got {}",
                FEATURE_DIMENSION,
                self.weights.len()
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ExportError::Schema(format!(
                "threshold {} outside [0, 1]",
                self.threshold
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ExportError::Schema("non-finite coefficient".to_string()));
        }
        Ok(())
    }

    /// Fall probability, as computed by the inference backend.
    ///
    /// Meaningful only for a record that passes [`FallModel::validate`]. On a
    /// malformed record, missing weights contribute nothing and surplus ones
    /// are ignored.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(features.as_array())
            .fold(0.0, |acc, (w, x)| acc + w * x)
            + self.bias;
        sigmoid(z)
    }

    /// `true` when the fall probability exceeds the threshold
    pub fn decide(&self, features: &FeatureVector) -> bool {
        self.probability(features) > self.threshold
    }
}

//! Binary Logistic Regression
//!
//! Penalised maximum likelihood fitted with Newton-Raphson and a backtracking
//! line search. The objective is
//! `sum(log_loss) + l2_penalty / 2 * ||w||²`, intercept unpenalised.

use feature_engine::{ClassCounts, FeatureVector, FEATURE_DIMENSION};
use nalgebra::{SMatrix, SVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::TrainerError;

/// Cutoff used by [`LogisticModel::predict`]
pub const DEFAULT_CUTOFF: f64 = 0.5;

/// Line search gives up after this many halvings
const MAX_HALVINGS: usize = 50;

/// Armijo sufficient-decrease constant
const ARMIJO_C: f64 = 1e-4;

/// Newton steps smaller than this (relative to the parameters) count as converged
const STEP_TOLERANCE: f64 = 1e-12;

/// Weights plus intercept
const PARAMS: usize = FEATURE_DIMENSION + 1;

type Hessian = SMatrix<f64, PARAMS, PARAMS>;
type Gradient = SVector<f64, PARAMS>;

/// Logistic sigmoid, σ(z) = 1 / (1 + e^(-z)), stable for large |z|
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

/// Solver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Iteration budget
    pub max_iter: usize,
    /// Convergence threshold on the largest absolute gradient component,
    /// divided by the number of training samples
    pub tolerance: f64,
    /// L2 strength on the weights (inverse of C)
    pub l2_penalty: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            max_iter: 500,
            tolerance: 1e-8,
            l2_penalty: 1.0,
        }
    }
}

/// Fitted decision function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Weights in `FEATURE_NAMES` order
    pub weights: [f64; FEATURE_DIMENSION],
    pub bias: f64,
    /// Newton iterations performed
    pub iterations: usize,
    /// Whether the gradient tolerance was reached
    pub converged: bool,
}

impl LogisticModel {
    /// Linear score w·x + b
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.weights[0] * features.accel_mag + self.weights[1] * features.gyro_mag + self.bias
    }

    /// Probability of the fall class
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// `true` when the fall probability exceeds `threshold`
    pub fn decide(&self, features: &FeatureVector, threshold: f64) -> bool {
        self.predict_proba(features) > threshold
    }

    /// Class labels at the default 0.5 cutoff
    pub fn predict(&self, features: &[FeatureVector]) -> Vec<u8> {
        features
            .iter()
            .map(|f| u8::from(self.predict_proba(f) >= DEFAULT_CUTOFF))
            .collect()
    }
}

impl LogisticRegression {
    /// Create a solver with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the L2 penalty.
    pub fn with_l2_penalty(mut self, l2_penalty: f64) -> Self {
        self.l2_penalty = l2_penalty;
        self
    }

    /// Fit on an `n × FEATURE_DIMENSION` matrix and binary labels
    pub fn fit(&self, x: ArrayView2<f64>, y: &[u8]) -> Result<LogisticModel, TrainerError> {
        let (n, d) = x.dim();
        if n != y.len() || d != FEATURE_DIMENSION {
            return Err(TrainerError::ShapeMismatch {
                rows: n,
                cols: d,
                labels: y.len(),
            });
        }
        if n == 0 {
            return Err(TrainerError::EmptyTrainingSet);
        }
        let counts = ClassCounts::from_labels(y);
        if !counts.has_both() {
            return Err(TrainerError::SingleClass(u8::from(counts.positive > 0)));
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(TrainerError::NonFinite);
        }

        // Augment with a constant column for the intercept
        let mut xa = Array2::<f64>::ones((n, d + 1));
        xa.slice_mut(ndarray::s![.., ..d]).assign(&x);
        let targets: Array1<f64> = y.iter().map(|&l| f64::from(u8::from(l != 0))).collect();

        let mut theta = Array1::<f64>::zeros(d + 1);
        let mut loss = self.objective(&xa, &targets, theta.view());
        let mut converged = false;
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;

            let z = xa.dot(&theta);
            let p = z.mapv(sigmoid);
            let residual = &p - &targets;

            let mut grad = xa.t().dot(&residual);
            for j in 0..d {
                grad[j] += self.l2_penalty * theta[j];
            }
            if !loss.is_finite() || grad.iter().any(|g| !g.is_finite()) {
                return Err(TrainerError::NonFinite);
            }

            if grad.iter().map(|g| g.abs()).fold(0.0, f64::max) / (n as f64) < self.tolerance {
                converged = true;
                break;
            }

            let s = p.mapv(|pi| pi * (1.0 - pi));
            let weighted = &xa * &s.view().insert_axis(Axis(1));
            let mut hessian = xa.t().dot(&weighted);
            for j in 0..d {
                hessian[[j, j]] += self.l2_penalty;
            }

            let step = newton_step(&hessian, &grad)?;
            let step_norm = step.iter().map(|v| v.abs()).fold(0.0, f64::max);
            let scale = theta.iter().map(|v| v.abs()).fold(1.0, f64::max);
            if step_norm <= STEP_TOLERANCE * scale {
                converged = true;
                break;
            }
            let slope = grad.dot(&step);

            let mut t = 1.0;
            let mut accepted = false;
            for _ in 0..MAX_HALVINGS {
                let candidate = &theta - &(&step * t);
                let candidate_loss = self.objective(&xa, &targets, candidate.view());
                if candidate_loss <= loss - ARMIJO_C * t * slope {
                    theta = candidate;
                    loss = candidate_loss;
                    accepted = true;
                    break;
                }
                t *= 0.5;
            }

            if !accepted {
                // No further decrease is representable
                debug!("Line search stalled at iteration {}", iterations);
                break;
            }
        }

        if !converged {
            warn!(
                "Logistic regression did not converge within {} iterations",
                self.max_iter
            );
        }

        let model = LogisticModel {
            weights: [theta[0], theta[1]],
            bias: theta[d],
            iterations,
            converged,
        };
        debug!(
            "Fitted weights={:?} bias={:.6} iterations={} converged={}",
            model.weights, model.bias, model.iterations, model.converged
        );
        Ok(model)
    }

    fn objective(&self, xa: &Array2<f64>, y: &Array1<f64>, theta: ArrayView1<f64>) -> f64 {
        let z = xa.dot(&theta);
        let nll: f64 = z
            .iter()
            .zip(y.iter())
            .map(|(&zi, &yi)| softplus(zi) - yi * zi)
            .sum();
        let d = theta.len() - 1;
        let penalty: f64 = theta.iter().take(d).map(|w| w * w).sum();
        nll + 0.5 * self.l2_penalty * penalty
    }
}

/// Newton direction: solves `hessian · step = grad`.
///
/// The penalised Hessian is symmetric positive definite, so Cholesky is tried
/// first. LU covers the semidefinite case left by a zero penalty.
fn newton_step(hessian: &Array2<f64>, grad: &Array1<f64>) -> Result<Array1<f64>, TrainerError> {
    let h = Hessian::from_fn(|i, j| hessian[[i, j]]);
    let g = Gradient::from_fn(|i, _| grad[i]);

    let step = match h.cholesky() {
        Some(chol) => chol.solve(&g),
        None => h.lu().solve(&g).ok_or(TrainerError::Singular)?,
    };
    if step.iter().any(|v| !v.is_finite()) {
        return Err(TrainerError::Singular);
    }
    Ok(step.iter().copied().collect())
}

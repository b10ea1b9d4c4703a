//! Label Policy
//!
//! Supplies one binary label per sample. Provided labels pass through; when the
//! corpus has none, samples whose acceleration magnitude exceeds a percentile
//! threshold are marked as falls, relaxing the percentile once if too few
//! positives result.

use feature_engine::{percentile, ClassCounts, FeatureVector};
use sensor_data::Corpus;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Errors during label assignment
#[derive(Debug, Clone, Error)]
pub enum LabelError {
    #[error("Cannot label an empty corpus")]
    EmptyCorpus,

    #[error("Feature count {features} does not match sample count {samples}")]
    LengthMismatch { samples: usize, features: usize },

    #[error("Only {positives} positive samples at the {percentile}th percentile, need at least {required}")]
    InsufficientPositives {
        positives: usize,
        required: usize,
        percentile: f64,
    },
}

/// Label derivation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// First percentile of accel_mag tried
    pub primary_percentile: f64,
    /// Single relaxation step when the first yields too few positives
    pub fallback_percentile: f64,
    /// Minimum viable positive class size
    pub min_positive: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            primary_percentile: 90.0,
            fallback_percentile: 80.0,
            min_positive: 5,
        }
    }
}

/// How the labels were obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabelSource {
    /// Taken from the corpus
    Provided,
    /// Derived from an accel_mag percentile
    Derived { percentile: f64, threshold: f64 },
}

/// Labels plus their provenance
#[derive(Debug, Clone)]
pub struct LabelSet {
    pub labels: Vec<u8>,
    pub source: LabelSource,
    pub counts: ClassCounts,
}

/// Assigns labels to a featurized corpus
pub struct LabelPolicy {
    config: LabelConfig,
}

impl LabelPolicy {
    /// Create a policy with the given thresholds
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    /// Label every sample of `corpus`; `features` must be parallel to it
    pub fn assign(&self, corpus: &Corpus, features: &[FeatureVector]) -> Result<LabelSet, LabelError> {
        if corpus.is_empty() {
            return Err(LabelError::EmptyCorpus);
        }
        if corpus.len() != features.len() {
            return Err(LabelError::LengthMismatch {
                samples: corpus.len(),
                features: features.len(),
            });
        }

        if corpus.has_labels {
            let labels: Vec<u8> = corpus
                .samples
                .iter()
                .map(|s| u8::from(s.label.unwrap_or(0) != 0))
                .collect();
            let counts = ClassCounts::from_labels(&labels);
            info!(
                "Using provided labels: {} normal, {} fall",
                counts.negative, counts.positive
            );
            return Ok(LabelSet {
                labels,
                source: LabelSource::Provided,
                counts,
            });
        }

        self.derive(features)
    }

    /// Derive labels from accel_mag alone
    pub fn derive(&self, features: &[FeatureVector]) -> Result<LabelSet, LabelError> {
        if features.is_empty() {
            return Err(LabelError::EmptyCorpus);
        }
        let accel: Vec<f64> = features.iter().map(|f| f.accel_mag).collect();

        let mut attempt = threshold_labels(&accel, self.config.primary_percentile);
        if attempt.counts.positive < self.config.min_positive {
            warn!(
                "Only {} positives at the {}th percentile, relaxing to the {}th",
                attempt.counts.positive,
                self.config.primary_percentile,
                self.config.fallback_percentile
            );
            attempt = threshold_labels(&accel, self.config.fallback_percentile);
        }

        if attempt.counts.positive < self.config.min_positive {
            let percentile = match attempt.source {
                LabelSource::Derived { percentile, .. } => percentile,
                LabelSource::Provided => self.config.fallback_percentile,
            };
            return Err(LabelError::InsufficientPositives {
                positives: attempt.counts.positive,
                required: self.config.min_positive,
                percentile,
            });
        }

        info!(
            "Derived labels: {} normal, {} fall ({:?})",
            attempt.counts.negative, attempt.counts.positive, attempt.source
        );
        Ok(attempt)
    }
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self::new(LabelConfig::default())
    }
}

fn threshold_labels(accel: &[f64], pct: f64) -> LabelSet {
    let threshold = percentile(accel, pct);
    let labels: Vec<u8> = accel.iter().map(|&a| u8::from(a > threshold)).collect();
    LabelSet {
        counts: ClassCounts::from_labels(&labels),
        labels,
        source: LabelSource::Derived {
            percentile: pct,
            threshold,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FeatureExtractor;
    use proptest::prelude::*;
    use sensor_data::{CorpusOrigin, RawSample};

    fn corpus(samples: Vec<RawSample>, has_labels: bool) -> Corpus {
        Corpus {
            samples,
            has_labels,
            origin: CorpusOrigin::Synthesized { seed: 0 },
        }
    }

    fn ramp(n: usize) -> Vec<RawSample> {
        (1..=n)
            .map(|i| RawSample::new(i as f64, 0.0, 0.0, 0.0, 0.0, 0.0))
            .collect()
    }

    fn label(corpus: &Corpus) -> Result<LabelSet, LabelError> {
        let features = FeatureExtractor::new().extract_all(&corpus.samples);
        LabelPolicy::default().assign(corpus, &features)
    }

    #[test]
    fn test_provided_labels_pass_through() {
        let samples = vec![
            RawSample::new(0.0, 0.0, 9.8, 0.0, 0.0, 0.0).with_label(0),
            RawSample::new(20.0, 0.0, 9.8, 0.0, 0.0, 0.0).with_label(1),
            RawSample::new(0.0, 0.0, 9.8, 0.0, 0.0, 0.0).with_label(1),
        ];
        let set = label(&corpus(samples, true)).unwrap();
        assert_eq!(set.labels, vec![0, 1, 1]);
        assert_eq!(set.source, LabelSource::Provided);
    }

    #[test]
    fn test_primary_percentile_about_ten_percent() {
        let set = label(&corpus(ramp(100), false)).unwrap();
        // rank 89.1 -> threshold 90.1, values 91..=100 are positive
        assert_eq!(set.counts.positive, 10);
        assert_eq!(&set.labels[90..], &[1; 10]);
        match set.source {
            LabelSource::Derived { percentile, threshold } => {
                assert_eq!(percentile, 90.0);
                assert!((threshold - 90.1).abs() < 1e-9);
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn test_escalates_to_fallback_percentile() {
        // 90th percentile of 1..=30 yields 3 positives, the 80th yields 6
        let set = label(&corpus(ramp(30), false)).unwrap();
        assert_eq!(set.counts.positive, 6);
        assert!(matches!(set.source, LabelSource::Derived { percentile, .. } if percentile == 80.0));
    }

    #[test]
    fn test_insufficient_after_escalation_fails() {
        let err = label(&corpus(ramp(20), false)).unwrap_err();
        match err {
            LabelError::InsufficientPositives { positives, required, percentile } => {
                assert_eq!(positives, 4);
                assert_eq!(required, 5);
                assert_eq!(percentile, 80.0);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_constant_magnitude_has_no_positives() {
        let samples = vec![RawSample::new(0.0, 0.0, 9.81, 0.0, 0.0, 0.0); 50];
        let err = label(&corpus(samples, false)).unwrap_err();
        assert!(matches!(err, LabelError::InsufficientPositives { positives: 0, .. }));
    }

    #[test]
    fn test_empty_corpus() {
        let err = label(&corpus(Vec::new(), false)).unwrap_err();
        assert!(matches!(err, LabelError::EmptyCorpus));
    }

    #[test]
    fn test_length_mismatch() {
        let c = corpus(ramp(3), false);
        let err = LabelPolicy::default().assign(&c, &[]).unwrap_err();
        assert!(matches!(err, LabelError::LengthMismatch { samples: 3, features: 0 }));
    }

    proptest! {
        #[test]
        fn prop_relaxed_threshold_never_loses_positives(
            mags in proptest::collection::vec(0f64..100.0, 1..200)
        ) {
            let strict = threshold_labels(&mags, 90.0);
            let relaxed = threshold_labels(&mags, 80.0);
            prop_assert!(relaxed.counts.positive >= strict.counts.positive);
        }
    }
}

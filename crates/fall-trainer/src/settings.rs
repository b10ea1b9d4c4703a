//! Pipeline Settings

use std::path::PathBuf;

use label_policy::LabelConfig;
use model_export::DEFAULT_THRESHOLD;
use sensor_data::SynthConfig;
use serde::{Deserialize, Serialize};
use trainer::TrainerConfig;

use crate::PipelineError;

/// Optional override file looked up in the working directory
pub const CONFIG_FILE: &str = "fall-trainer";

/// Everything a training run depends on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CSV dataset; synthesis is used when absent
    pub dataset_path: PathBuf,
    /// Model file consumed by the backend
    pub output_path: PathBuf,

    /// Synthesis seed
    pub synth_seed: u64,
    /// Synthesized samples per class
    pub samples_per_class: usize,

    /// Label derivation percentiles
    pub primary_percentile: f64,
    pub fallback_percentile: f64,
    /// Minimum derived positives
    pub min_positive: usize,

    /// Split seed
    pub split_seed: u64,
    pub test_fraction: f64,
    pub max_iter: usize,

    /// Exported decision threshold
    pub decision_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let synth = SynthConfig::default();
        let labels = LabelConfig::default();
        let trainer = TrainerConfig::default();
        Self {
            dataset_path: PathBuf::from("data/sample_sensor.csv"),
            output_path: PathBuf::from("backend/src/main/resources/model/fall_model.bin"),
            synth_seed: synth.seed,
            samples_per_class: synth.samples_per_class,
            primary_percentile: labels.primary_percentile,
            fallback_percentile: labels.fallback_percentile,
            min_positive: labels.min_positive,
            split_seed: trainer.seed,
            test_fraction: trainer.test_fraction,
            max_iter: trainer.max_iter,
            decision_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Defaults, overridden by `fall-trainer.toml` when present
    pub fn load() -> Result<Self, PipelineError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(CONFIG_FILE).required(false))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run could succeed with
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(PipelineError::Config(format!(
                "decision_threshold {} outside [0, 1]",
                self.decision_threshold
            )));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::Config(format!(
                "test_fraction {} outside (0, 1)",
                self.test_fraction
            )));
        }
        for pct in [self.primary_percentile, self.fallback_percentile] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(PipelineError::Config(format!("percentile {pct} outside [0, 100]")));
            }
        }
        if self.samples_per_class == 0 {
            return Err(PipelineError::Config("samples_per_class must be positive".to_string()));
        }
        Ok(())
    }

    /// Synthesis settings
    pub fn synth_config(&self) -> SynthConfig {
        SynthConfig {
            seed: self.synth_seed,
            samples_per_class: self.samples_per_class,
            ..Default::default()
        }
    }

    /// Label derivation settings
    pub fn label_config(&self) -> LabelConfig {
        LabelConfig {
            primary_percentile: self.primary_percentile,
            fallback_percentile: self.fallback_percentile,
            min_positive: self.min_positive,
        }
    }

    /// Split and solver settings
    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            test_fraction: self.test_fraction,
            seed: self.split_seed,
            max_iter: self.max_iter,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.dataset_path, PathBuf::from("data/sample_sensor.csv"));
        assert_eq!(config.synth_seed, 0);
        assert_eq!(config.split_seed, 42);
        assert_eq!(config.decision_threshold, 0.6);
        assert_eq!(config.min_positive, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sub_configs() {
        let config = PipelineConfig {
            synth_seed: 9,
            primary_percentile: 95.0,
            split_seed: 1,
            ..Default::default()
        };
        assert_eq!(config.synth_config().seed, 9);
        assert_eq!(config.synth_config().samples_per_class, 400);
        assert_eq!(config.label_config().primary_percentile, 95.0);
        assert_eq!(config.trainer_config().seed, 1);
        assert_eq!(config.trainer_config().max_iter, 500);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(
                "output_path = \"out/model.json\"\nsplit_seed = 7\n",
                ::config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: PipelineConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.output_path, PathBuf::from("out/model.json"));
        assert_eq!(config.split_seed, 7);
        assert_eq!(config.decision_threshold, 0.6);
        assert_eq!(config.samples_per_class, 400);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_threshold = PipelineConfig {
            decision_threshold: 1.2,
            ..Default::default()
        };
        assert!(matches!(bad_threshold.validate(), Err(PipelineError::Config(_))));

        let bad_fraction = PipelineConfig {
            test_fraction: 0.0,
            ..Default::default()
        };
        assert!(matches!(bad_fraction.validate(), Err(PipelineError::Config(_))));
    }
}

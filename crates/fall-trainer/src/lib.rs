//! Fall Detection Trainer
//!
//! Runs the linear training pipeline:
//! sample source → feature extraction → label policy → trainer → model export.
//! Writing the model file is the only side effect.

mod settings;

pub use settings::{PipelineConfig, CONFIG_FILE};

use std::path::PathBuf;

use feature_engine::{ClassCounts, FeatureExtractor, FeatureVector};
use label_policy::{LabelError, LabelPolicy, LabelSource};
use model_export::{ExportError, FallModel, ModelExporter};
use sensor_data::{CorpusOrigin, SampleSource, SensorDataError};
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use trainer::{Trainer, TrainerError, TrainingOutcome};

/// Pipeline error types
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    Settings(#[from] ::config::ConfigError),

    #[error("Sample acquisition failed: {0}")]
    Data(#[from] SensorDataError),

    #[error("Labelling failed: {0}")]
    Label(#[from] LabelError),

    #[error("Training failed: {0}")]
    Train(#[from] TrainerError),

    #[error("Model export failed: {0}")]
    Export(#[from] ExportError),
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub origin: CorpusOrigin,
    /// Features of the full corpus, in corpus order
    pub features: Vec<FeatureVector>,
    /// Labels parallel to `features`
    pub labels: Vec<u8>,
    pub label_source: LabelSource,
    pub label_counts: ClassCounts,
    pub training: TrainingOutcome,
    /// The record that was written
    pub model: FallModel,
    pub output_path: PathBuf,
}

/// Execute one training run and write the model file
pub fn run(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    config.validate()?;

    let corpus = SampleSource::new(&config.dataset_path, config.synth_config()).acquire()?;

    let features = FeatureExtractor::new().extract_all(&corpus.samples);

    let label_set = LabelPolicy::new(config.label_config()).assign(&corpus, &features)?;

    let training = Trainer::new(config.trainer_config()).train(&features, &label_set.labels)?;
    info!(
        "Fitted weights accel_mag={:.6} gyro_mag={:.6} bias={:.6}",
        training.model.weights[0], training.model.weights[1], training.model.bias
    );

    let model = FallModel::from_fitted(&training.model, config.decision_threshold);
    ModelExporter::new(&config.output_path).export(&model)?;

    Ok(PipelineReport {
        origin: corpus.origin,
        features,
        labels: label_set.labels,
        label_source: label_set.source,
        label_counts: label_set.counts,
        training,
        model,
        output_path: config.output_path.clone(),
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

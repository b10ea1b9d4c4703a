//! Fall Model Export
//!
//! Packages a fitted logistic decision function as the flat JSON weight
//! record read by the inference backend.

mod exporter;
mod model;

pub use exporter::ModelExporter;
pub use model::{FallModel, DEFAULT_THRESHOLD, MODEL_TYPE};

use thiserror::Error;

/// Errors while writing or reading a model file
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid model record: {0}")]
    Schema(String),
}

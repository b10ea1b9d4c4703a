//! Model File Writer

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::model::FallModel;
use crate::ExportError;

/// Writes and reads the model file at a fixed location
pub struct ModelExporter {
    output_path: PathBuf,
}

impl ModelExporter {
    /// Create an exporter targeting `output_path`
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Serialize `model`, replacing any existing file.
    ///
    /// Parent directories are created as needed. The record is written to a
    /// sibling temporary file first and renamed into place, so readers never
    /// observe a partial model.
    pub fn export(&self, model: &FallModel) -> Result<(), ExportError> {
        model.validate()?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(model)?;
        let staging = staging_path(&self.output_path);
        fs::write(&staging, json.as_bytes())?;
        if let Err(e) = fs::rename(&staging, &self.output_path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        info!("Saved model to {}", self.output_path.display());
        Ok(())
    }

    /// Read the model file back and check its schema
    pub fn load(&self) -> Result<FallModel, ExportError> {
        Self::load_from(&self.output_path)
    }

    /// Read a model file from any path
    pub fn load_from(path: &Path) -> Result<FallModel, ExportError> {
        let text = fs::read_to_string(path)?;
        let model: FallModel = serde_json::from_str(&text)?;
        model.validate()?;
        debug!("Loaded model from {}", path.display());
        Ok(model)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

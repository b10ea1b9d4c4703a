//! Corpus Acquisition

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::SensorDataError;
use crate::loader::load_csv;
use crate::synth::{synthesize, SynthConfig};
use crate::RawSample;

/// Where a corpus came from
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusOrigin {
    /// Loaded from a dataset file
    Dataset(PathBuf),
    /// Generated with the given seed
    Synthesized { seed: u64 },
}

/// A non-empty collection of raw samples
#[derive(Debug, Clone)]
pub struct Corpus {
    pub samples: Vec<RawSample>,
    /// Whether every sample carries a ground-truth label
    pub has_labels: bool,
    pub origin: CorpusOrigin,
}

impl Corpus {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Sample source: dataset file with a synthetic fallback
pub struct SampleSource {
    dataset_path: PathBuf,
    synth: SynthConfig,
}

impl SampleSource {
    /// Create a source for the given dataset path
    pub fn new(dataset_path: impl Into<PathBuf>, synth: SynthConfig) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            synth,
        }
    }

    /// Load the dataset if present, otherwise synthesize
    pub fn acquire(&self) -> Result<Corpus, SensorDataError> {
        if self.dataset_path.exists() {
            let corpus = load_csv(&self.dataset_path)?;
            info!(
                "Loaded {} samples from {}",
                corpus.len(),
                self.dataset_path.display()
            );
            return Ok(corpus);
        }

        warn!(
            "Dataset {} not found, synthesizing {} samples per class",
            self.dataset_path.display(),
            self.synth.samples_per_class
        );
        Ok(Corpus {
            samples: synthesize(&self.synth),
            has_labels: true,
            origin: CorpusOrigin::Synthesized {
                seed: self.synth.seed,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dataset_falls_back_to_synthesis() {
        let dir = tempfile::tempdir().unwrap();
        let source = SampleSource::new(dir.path().join("absent.csv"), SynthConfig::default());

        let corpus = source.acquire().unwrap();
        assert_eq!(corpus.len(), 800);
        assert!(corpus.has_labels);
        assert_eq!(corpus.origin, CorpusOrigin::Synthesized { seed: 0 });
    }

    #[test]
    fn test_existing_dataset_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "ax,ay,az,gx,gy,gz\n0,0,9.81,0,0,0\n").unwrap();

        let corpus = SampleSource::new(&path, SynthConfig::default())
            .acquire()
            .unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(!corpus.has_labels);
        assert_eq!(corpus.origin, CorpusOrigin::Dataset(path));
    }

    #[test]
    fn test_existing_dataset_with_missing_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "ax,ay,az\n0,0,9.81\n").unwrap();

        let err = SampleSource::new(&path, SynthConfig::default())
            .acquire()
            .unwrap_err();
        assert!(matches!(err, SensorDataError::MissingColumn("gx")));
    }
}

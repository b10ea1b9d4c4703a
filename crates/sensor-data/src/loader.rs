//! CSV Dataset Loader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::SensorDataError;
use crate::source::{Corpus, CorpusOrigin};
use crate::RawSample;

/// Required axis columns, in `RawSample` field order
pub const AXIS_COLUMNS: [&str; 6] = ["ax", "ay", "az", "gx", "gy", "gz"];

/// Optional ground-truth column
pub const LABEL_COLUMN: &str = "label";

/// Load a labelled or unlabelled corpus from a CSV file
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Corpus, SensorDataError> {
    let path = path.as_ref();
    debug!("Loading dataset from {}", path.display());
    let file = File::open(path)?;
    let (samples, has_labels) = read_samples(file)?;
    Ok(Corpus {
        samples,
        has_labels,
        origin: CorpusOrigin::Dataset(path.to_path_buf()),
    })
}

/// Parse samples from any CSV reader, returning them with a label-column flag
pub(crate) fn read_samples<R: Read>(reader: R) -> Result<(Vec<RawSample>, bool), SensorDataError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut axis_idx = [0usize; 6];
    for (slot, name) in axis_idx.iter_mut().zip(AXIS_COLUMNS) {
        *slot = column_index(&headers, name).ok_or(SensorDataError::MissingColumn(name))?;
    }
    let label_idx = column_index(&headers, LABEL_COLUMN);

    let mut samples = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let mut axes = [0.0f64; 6];
        for ((value, &idx), name) in axes.iter_mut().zip(&axis_idx).zip(AXIS_COLUMNS) {
            *value = parse_number(&record, idx, row, name)?;
        }

        let mut sample = RawSample::new(axes[0], axes[1], axes[2], axes[3], axes[4], axes[5]);
        if let Some(idx) = label_idx {
            sample = sample.with_label(parse_label(&record, idx, row)?);
        }
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(SensorDataError::EmptyDataset);
    }

    debug!(
        "Loaded {} samples (label column: {})",
        samples.len(),
        label_idx.is_some()
    );
    Ok((samples, label_idx.is_some()))
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

fn parse_number(
    record: &StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> Result<f64, SensorDataError> {
    let raw = record.get(idx).unwrap_or("");
    // `f64::from_str` accepts "nan" and "inf"; readings must be finite
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SensorDataError::InvalidValue {
            row,
            column,
            value: raw.to_string(),
        })
}

fn parse_label(record: &StringRecord, idx: usize, row: usize) -> Result<u8, SensorDataError> {
    let raw = record.get(idx).unwrap_or("");
    if raw.eq_ignore_ascii_case("true") {
        return Ok(1);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Ok(0);
    }
    let value = parse_number(record, idx, row, LABEL_COLUMN)?;
    Ok(u8::from(value.trunc() != 0.0))
}

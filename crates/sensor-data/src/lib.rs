//! IMU Sensor Data
//!
//! Provides the typed 6-axis sample record and the sources that produce a
//! training corpus: a CSV dataset when one exists, seeded synthesis otherwise.

mod error;
mod loader;
mod source;
mod synth;

pub use error::SensorDataError;
pub use loader::{load_csv, AXIS_COLUMNS, LABEL_COLUMN};
pub use source::{Corpus, CorpusOrigin, SampleSource};
pub use synth::{synthesize, SynthConfig};

use serde::{Deserialize, Serialize};

/// One raw accelerometer + gyroscope reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Acceleration X (m/s²)
    pub ax: f64,
    /// Acceleration Y (m/s²)
    pub ay: f64,
    /// Acceleration Z (m/s²)
    pub az: f64,
    /// Angular rate X (deg/s)
    pub gx: f64,
    /// Angular rate Y (deg/s)
    pub gy: f64,
    /// Angular rate Z (deg/s)
    pub gz: f64,
    /// Ground truth, 0 = normal, 1 = fall
    pub label: Option<u8>,
}

impl RawSample {
    /// Create an unlabelled sample
    pub fn new(ax: f64, ay: f64, az: f64, gx: f64, gy: f64, gz: f64) -> Self {
        Self {
            ax,
            ay,
            az,
            gx,
            gy,
            gz,
            label: None,
        }
    }

    /// Attach a label (cast to 0/1)
    pub fn with_label(mut self, label: u8) -> Self {
        self.label = Some(u8::from(label != 0));
        self
    }

    /// Acceleration axes
    pub fn accel(&self) -> [f64; 3] {
        [self.ax, self.ay, self.az]
    }

    /// Angular rate axes
    pub fn gyro(&self) -> [f64; 3] {
        [self.gx, self.gy, self.gz]
    }
}

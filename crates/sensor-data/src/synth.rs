//! Seeded Synthetic Corpus

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::RawSample;

/// Standard gravity (m/s²)
const GRAVITY: f64 = 9.81;

/// Noise policy for the two synthesized classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    /// RNG seed
    pub seed: u64,
    /// Samples generated for each class
    pub samples_per_class: usize,
    /// Accel noise at rest (m/s²)
    pub normal_accel_std: f64,
    /// Gyro noise at rest (deg/s)
    pub normal_gyro_std: f64,
    /// Accel noise during a fall (m/s²)
    pub fall_accel_std: f64,
    /// Lateral displacement applied as ± on X and Y during a fall (m/s²)
    pub fall_lateral_offset: f64,
    /// Vertical accel mean during a fall (m/s²)
    pub fall_vertical_mean: f64,
    /// Vertical accel noise during a fall (m/s²)
    pub fall_vertical_std: f64,
    /// Gyro noise during a fall (deg/s)
    pub fall_gyro_std: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            samples_per_class: 400,
            normal_accel_std: 0.4,
            normal_gyro_std: 3.0,
            fall_accel_std: 8.0,
            fall_lateral_offset: 15.0,
            fall_vertical_mean: 12.0,
            fall_vertical_std: 6.0,
            fall_gyro_std: 40.0,
        }
    }
}

/// Generate `samples_per_class` normal samples followed by as many fall samples
pub fn synthesize(config: &SynthConfig) -> Vec<RawSample> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.samples_per_class;
    let mut samples = Vec::with_capacity(n * 2);

    for _ in 0..n {
        let ax = gaussian(&mut rng, 0.0, config.normal_accel_std);
        let ay = gaussian(&mut rng, 0.0, config.normal_accel_std);
        let az = GRAVITY + gaussian(&mut rng, 0.0, config.normal_accel_std);
        let gx = gaussian(&mut rng, 0.0, config.normal_gyro_std);
        let gy = gaussian(&mut rng, 0.0, config.normal_gyro_std);
        let gz = gaussian(&mut rng, 0.0, config.normal_gyro_std);
        samples.push(RawSample::new(ax, ay, az, gx, gy, gz).with_label(0));
    }

    for _ in 0..n {
        let ax = gaussian(&mut rng, 0.0, config.fall_accel_std)
            + signed(&mut rng, config.fall_lateral_offset);
        let ay = gaussian(&mut rng, 0.0, config.fall_accel_std)
            + signed(&mut rng, config.fall_lateral_offset);
        let az = gaussian(&mut rng, config.fall_vertical_mean, config.fall_vertical_std);
        let gx = gaussian(&mut rng, 0.0, config.fall_gyro_std);
        let gy = gaussian(&mut rng, 0.0, config.fall_gyro_std);
        let gz = gaussian(&mut rng, 0.0, config.fall_gyro_std);
        samples.push(RawSample::new(ax, ay, az, gx, gy, gz).with_label(1));
    }

    debug!(
        "Synthesized {} samples (seed={}, {} per class)",
        samples.len(),
        config.seed,
        n
    );
    samples
}

/// Box-Muller normal deviate
fn gaussian<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-10);
    let u2: f64 = rng.random::<f64>();
    mean + (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos() * std_dev
}

/// `+magnitude` or `-magnitude` with equal probability
fn signed<R: Rng>(rng: &mut R, magnitude: f64) -> f64 {
    if rng.random::<bool>() {
        magnitude
    } else {
        -magnitude
    }
}

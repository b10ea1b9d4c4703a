//! Magnitude Feature Vector

use ndarray::Array2;
use sensor_data::RawSample;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 2;

/// Feature names, in weight order. Changing this breaks exported models.
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = ["accel_mag", "gyro_mag"];

/// Feature vector for the fall classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Euclidean norm of acceleration (m/s²)
    pub accel_mag: f64,
    /// Euclidean norm of angular rate (deg/s)
    pub gyro_mag: f64,
}

impl FeatureVector {
    /// Values in `FEATURE_NAMES` order
    pub fn as_array(&self) -> [f64; FEATURE_DIMENSION] {
        [self.accel_mag, self.gyro_mag]
    }
}

/// Stateless extractor shared by training and inference
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract the magnitude features of one sample
    pub fn extract(&self, sample: &RawSample) -> FeatureVector {
        FeatureVector {
            accel_mag: magnitude(sample.accel()),
            gyro_mag: magnitude(sample.gyro()),
        }
    }

    /// Extract features for a whole corpus, preserving order
    pub fn extract_all(&self, samples: &[RawSample]) -> Vec<FeatureVector> {
        let features: Vec<FeatureVector> = samples.iter().map(|s| self.extract(s)).collect();
        debug!("Extracted features for {} samples", features.len());
        features
    }
}

fn magnitude([x, y, z]: [f64; 3]) -> f64 {
    x.hypot(y).hypot(z)
}

/// Stack feature vectors into an `n × FEATURE_DIMENSION` matrix
pub fn design_matrix(features: &[FeatureVector]) -> Array2<f64> {
    let mut x = Array2::zeros((features.len(), FEATURE_DIMENSION));
    for (mut row, f) in x.rows_mut().into_iter().zip(features) {
        row[0] = f.accel_mag;
        row[1] = f.gyro_mag;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::new();
        let sample = RawSample::new(3.0, 4.0, 0.0, 0.0, 6.0, 8.0);

        let features = extractor.extract(&sample);
        assert!((features.accel_mag - 5.0).abs() < 1e-12);
        assert!((features.gyro_mag - 10.0).abs() < 1e-12);
        assert_eq!(features.as_array(), [features.accel_mag, features.gyro_mag]);
    }

    #[test]
    fn test_at_rest_is_gravity() {
        let features = FeatureExtractor::new().extract(&RawSample::new(0.0, 0.0, 9.81, 0.0, 0.0, 0.0));
        assert_eq!(features.accel_mag, 9.81);
        assert_eq!(features.gyro_mag, 0.0);
    }

    #[test]
    fn test_large_components_stay_finite() {
        let features = FeatureExtractor::new().extract(&RawSample::new(1e200, 1e200, 1e200, -3e160, 4e160, 0.0));
        let expected = 1e200 * 3f64.sqrt();
        assert!(features.accel_mag.is_finite());
        assert!((features.accel_mag - expected).abs() / expected < 1e-12);
        assert!((features.gyro_mag - 5e160).abs() / 5e160 < 1e-12);
    }

    #[test]
    fn test_design_matrix_layout() {
        let features = vec![
            FeatureVector { accel_mag: 1.0, gyro_mag: 2.0 },
            FeatureVector { accel_mag: 3.0, gyro_mag: 4.0 },
        ];
        let x = design_matrix(&features);
        assert_eq!(x.dim(), (2, FEATURE_DIMENSION));
        assert_eq!(x[[1, 0]], 3.0);
        assert_eq!(x[[0, 1]], 2.0);
    }

    #[test]
    fn test_feature_names_order() {
        assert_eq!(FEATURE_NAMES, ["accel_mag", "gyro_mag"]);
    }

    proptest! {
        #[test]
        fn prop_magnitudes_non_negative(
            ax in -1e3f64..1e3, ay in -1e3f64..1e3, az in -1e3f64..1e3,
            gx in -1e3f64..1e3, gy in -1e3f64..1e3, gz in -1e3f64..1e3,
        ) {
            let f = FeatureExtractor::new().extract(&RawSample::new(ax, ay, az, gx, gy, gz));
            prop_assert!(f.accel_mag >= 0.0);
            prop_assert!(f.gyro_mag >= 0.0);
            prop_assert_eq!(f.accel_mag == 0.0, ax == 0.0 && ay == 0.0 && az == 0.0);
            prop_assert_eq!(f.gyro_mag == 0.0, gx == 0.0 && gy == 0.0 && gz == 0.0);
        }

        #[test]
        fn prop_rotation_about_z_invariant(x in -50f64..50.0, y in -50f64..50.0, z in -50f64..50.0, theta in 0f64..6.28) {
            let (s, c) = theta.sin_cos();
            let extractor = FeatureExtractor::new();
            let a = extractor.extract(&RawSample::new(x, y, z, 0.0, 0.0, 0.0));
            let b = extractor.extract(&RawSample::new(c * x - s * y, s * x + c * y, z, 0.0, 0.0, 0.0));
            prop_assert!((a.accel_mag - b.accel_mag).abs() < 1e-9);
        }
    }
}

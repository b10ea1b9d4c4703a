//! Corpus Statistics

use serde::{Deserialize, Serialize};

/// Percentile `p` (0-100) with linear interpolation between closest ranks.
///
/// The rank of the percentile is `p / 100 * (n - 1)` over the sorted values.
/// Returns 0 for an empty slice. NaN values sort last.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Per-class member counts for a binary label set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub negative: usize,
    pub positive: usize,
}

impl ClassCounts {
    /// Count labels; any non-zero label is positive
    pub fn from_labels(labels: &[u8]) -> Self {
        let positive = labels.iter().filter(|&&l| l != 0).count();
        Self {
            negative: labels.len() - positive,
            positive,
        }
    }

    /// Total number of labels
    pub fn total(&self) -> usize {
        self.negative + self.positive
    }

    /// Size of the smaller class
    pub fn min(&self) -> usize {
        self.negative.min(self.positive)
    }

    /// Whether both classes are present
    pub fn has_both(&self) -> bool {
        self.min() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let values: Vec<f64> = (1..=30).map(f64::from).collect();
        // rank 0.9 * 29 = 26.1 -> between 27 and 28
        assert!((percentile(&values, 90.0) - 27.1).abs() < 1e-9);
        assert!((percentile(&values, 80.0) - 24.2).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let values = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 50.0), 3.0);
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 100.0), 5.0);
    }

    #[test]
    fn test_percentile_single_and_empty() {
        assert_eq!(percentile(&[7.5], 90.0), 7.5);
        assert_eq!(percentile(&[], 90.0), 0.0);
    }

    #[test]
    fn test_class_counts() {
        let counts = ClassCounts::from_labels(&[0, 1, 1, 0, 0]);
        assert_eq!(counts.negative, 3);
        assert_eq!(counts.positive, 2);
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.min(), 2);
        assert!(counts.has_both());
        assert!(!ClassCounts::from_labels(&[1, 1]).has_both());
    }
}

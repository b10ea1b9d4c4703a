//! Train/Test Partitioning

use feature_engine::ClassCounts;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Minimum members per class before a stratified split is attempted
pub const MIN_STRATUM: usize = 2;

/// Index partition of a labelled set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
    /// Whether class proportions were preserved
    pub stratified: bool,
}

/// Partition `labels` into train and test indices.
///
/// Stratifies when both classes have at least [`MIN_STRATUM`] members and
/// shuffles the whole index set otherwise. The same seed gives the same split.
pub fn train_test_split(labels: &[u8], test_fraction: f64, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    let fraction = test_fraction.clamp(0.0, 1.0);
    let counts = ClassCounts::from_labels(labels);

    let split = if counts.min() >= MIN_STRATUM {
        let mut train = Vec::with_capacity(labels.len());
        let mut test = Vec::new();

        for class in [0u8, 1u8] {
            let mut members: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|(_, &l)| u8::from(l != 0) == class)
                .map(|(i, _)| i)
                .collect();
            members.shuffle(&mut rng);

            let n = members.len();
            let n_test = ((n as f64 * fraction).round() as usize).clamp(1, n - 1);
            test.extend_from_slice(&members[..n_test]);
            train.extend_from_slice(&members[n_test..]);
        }

        train.shuffle(&mut rng);
        test.shuffle(&mut rng);
        Split {
            train,
            test,
            stratified: true,
        }
    } else {
        let mut indices: Vec<usize> = (0..labels.len()).collect();
        indices.shuffle(&mut rng);

        let n = indices.len();
        let n_test = ((n as f64 * fraction).ceil() as usize).min(n.saturating_sub(1));
        let train = indices.split_off(n_test);
        Split {
            train,
            test: indices,
            stratified: false,
        }
    };

    debug!(
        "Split {} samples: train={}, test={}, stratified={}",
        labels.len(),
        split.train.len(),
        split.test.len(),
        split.stratified
    );
    split
}

/// Gather the elements of `items` at `indices`
pub fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}

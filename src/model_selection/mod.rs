//! Train/test splitting.
//!
//! Shuffles sample indices with a seeded RNG, then takes the first
//! `n - round(n * test_size)` as the training set and the rest as the held-out
//! set. The same seed always yields the same partition.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{HealthError, Result};
use crate::primitives::Matrix;

/// Fraction of samples held out by default.
pub const DEFAULT_TEST_SIZE: f32 = 0.2;

/// Seed used when no other is configured.
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Result of [`train_test_split`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training features
    pub x_train: Matrix<f32>,
    /// Held-out features
    pub x_test: Matrix<f32>,
    /// Training labels
    pub y_train: Vec<usize>,
    /// Held-out labels
    pub y_test: Vec<usize>,
}

impl TrainTestSplit {
    /// Number of training samples.
    #[must_use]
    pub fn n_train(&self) -> usize {
        self.y_train.len()
    }

    /// Number of held-out samples.
    #[must_use]
    pub fn n_test(&self) -> usize {
        self.y_test.len()
    }
}

fn validate_split_inputs(n_samples: usize, n_labels: usize, test_size: f32) -> Result<usize> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(HealthError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: test_size.to_string(),
            constraint: "0 < test_size < 1".to_string(),
        });
    }

    if n_samples != n_labels {
        return Err(HealthError::dimension_mismatch("n_labels", n_samples, n_labels));
    }

    // test_size is f32, so trim its representation error before ceil
    let raw = n_samples as f64 * f64::from(test_size);
    let n_test = (raw - raw * 1e-6).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);

    if n_test == 0 || n_train == 0 {
        return Err(format!(
            "Split would result in empty train or test set (n_train={n_train}, n_test={n_test})"
        )
        .into());
    }

    Ok(n_train)
}

/// Returns `0..n_samples` shuffled with the given seed.
#[must_use]
pub fn shuffle_indices(n_samples: usize, random_state: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(random_state);
    indices.shuffle(&mut rng);
    indices
}

/// Splits features and labels into a training and a held-out set.
///
/// # Errors
///
/// Returns an error if `test_size` is not in `(0, 1)`, the label count does
/// not match the row count, or either side of the split would be empty.
///
/// # Example
///
/// ```
/// use stress2health::model_selection::train_test_split;
/// use stress2health::primitives::Matrix;
///
/// let x = Matrix::from_vec(10, 1, (0..10).map(|i| i as f32).collect()).expect("10x1");
/// let y: Vec<usize> = (0..10).map(|i| i % 2).collect();
/// let split = train_test_split(&x, &y, 0.2, 42).expect("valid split");
/// assert_eq!(split.n_train(), 8);
/// assert_eq!(split.n_test(), 2);
/// ```
pub fn train_test_split(
    x: &Matrix<f32>,
    y: &[usize],
    test_size: f32,
    random_state: u64,
) -> Result<TrainTestSplit> {
    let n_train = validate_split_inputs(x.n_rows(), y.len(), test_size)?;

    let indices = shuffle_indices(x.n_rows(), random_state);
    let (train_idx, test_idx) = indices.split_at(n_train);

    Ok(TrainTestSplit {
        x_train: x.select_rows(train_idx),
        x_test: x.select_rows(test_idx),
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}

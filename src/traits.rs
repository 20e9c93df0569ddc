//! Core traits for classifiers and transformers.
//!
//! Every stress-classification strategy implements [`Classifier`] over the
//! same encoded, scaled feature matrix, so strategies can be swapped without
//! touching the risk engine or the guidance resolver.

use crate::error::Result;
use crate::primitives::Matrix;

/// Capability set shared by all stress classification strategies.
///
/// Labels are dense class indices `0..n_classes` produced by
/// [`LabelEncoder`](crate::preprocessing::LabelEncoder).
///
/// # Examples
///
/// ```
/// use stress2health::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 0.1, 0.9, 1.0]).expect("4x1");
/// let y = vec![0, 0, 1, 1];
///
/// let mut tree = DecisionTreeClassifier::new().with_max_depth(2);
/// tree.fit(&x, &y).expect("fit");
/// assert_eq!(tree.predict(&x).expect("fitted"), y);
/// assert!((tree.score(&x, &y).expect("fitted") - 1.0).abs() < 1e-6);
/// ```
pub trait Classifier {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty, shapes disagree or a
    /// hyperparameter is invalid.
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()>;

    /// Predicts class indices for each row of `x`.
    ///
    /// # Errors
    ///
    /// Returns `ModelNotLoaded` if the model is not fitted, or a dimension
    /// error if `x` has the wrong width.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>>;

    /// Predicts a probability distribution over classes for each row.
    ///
    /// The result has shape `(n_samples, n_classes)`; each row sums to 1.
    ///
    /// # Errors
    ///
    /// Same as [`Classifier::predict`].
    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Number of classes seen during fit, `None` before fitting.
    fn n_classes(&self) -> Option<usize>;

    /// Accuracy on the given samples.
    ///
    /// # Errors
    ///
    /// Same as [`Classifier::predict`].
    fn score(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        let predictions = self.predict(x)?;
        Ok(crate::metrics::accuracy(&predictions, y))
    }
}

/// Trait for data transformers (scalers, encoders, etc.).
///
/// ```
/// use stress2health::prelude::*;
///
/// let x = Matrix::from_vec(2, 1, vec![1.0, 3.0]).expect("2x1");
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&x).expect("fit");
/// assert!((scaled.get(0, 0) + 1.0).abs() < 1e-6);
/// ```
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if transformer is not fitted.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}

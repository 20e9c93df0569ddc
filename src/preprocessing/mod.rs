//! Preprocessing transformers for the stress classifier inputs.
//!
//! [`StandardScaler`] standardizes the encoded lifestyle features with the
//! mean and standard deviation of the training split. [`LabelEncoder`] maps
//! stress labels to dense class indices and back.
//!
//! # Example
//!
//! ```
//! use stress2health::prelude::*;
//!
//! // Sleep hours and work hours live on very different ranges
//! let data = Matrix::from_vec(4, 2, vec![
//!     5.0, 12.0,
//!     6.0, 10.0,
//!     7.0, 8.0,
//!     8.0, 6.0,
//! ]).expect("valid matrix dimensions");
//!
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
//!
//! // Each column now has mean ≈ 0
//! let col_mean: f32 = scaled.column(0).iter().sum::<f32>() / 4.0;
//! assert!(col_mean.abs() < 1e-5);
//! ```

mod label;

pub use label::LabelEncoder;

use serde::{Deserialize, Serialize};

use crate::error::{HealthError, Result};
use crate::primitives::Matrix;
use crate::traits::Transformer;

/// Columns whose spread is at or below this are only centered.
const MIN_STD: f32 = 1e-10;

/// Standardizes features by removing the mean and scaling to unit variance.
///
/// The transformation is `(x - mean) / std`, using the population standard
/// deviation. Parameters are learned once by [`Transformer::fit`] and reused
/// unchanged at inference time.
///
/// # Example
///
/// ```
/// use stress2health::prelude::*;
///
/// let data = Matrix::from_vec(3, 2, vec![
///     0.0, 0.0,
///     1.0, 10.0,
///     2.0, 20.0,
/// ]).expect("valid matrix dimensions");
///
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
///
/// assert!((scaled.get(1, 0)).abs() < 1e-6);
/// assert!((scaled.get(1, 1)).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f32>>,
    /// Whether to center the data.
    with_mean: bool,
    /// Whether to scale the data.
    with_std: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a new `StandardScaler` with centering and scaling enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            with_mean: true,
            with_std: true,
        }
    }

    /// Sets whether to center the data by subtracting the mean.
    #[must_use]
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Sets whether to scale the data by dividing by standard deviation.
    #[must_use]
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }

    /// Returns the mean of each feature, `None` before fitting.
    #[must_use]
    pub fn mean(&self) -> Option<&[f32]> {
        self.mean.as_deref()
    }

    /// Returns the standard deviation of each feature, `None` before fitting.
    #[must_use]
    pub fn std(&self) -> Option<&[f32]> {
        self.std.as_deref()
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Number of features seen during fit.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.mean.as_ref().map(Vec::len)
    }

    fn fitted_params(&self, n_features: usize) -> Result<(&[f32], &[f32])> {
        let (Some(mean), Some(std)) = (self.mean.as_deref(), self.std.as_deref()) else {
            return Err(HealthError::from("Scaler not fitted"));
        };
        if n_features != mean.len() {
            return Err(HealthError::dimension_mismatch(
                "n_features",
                mean.len(),
                n_features,
            ));
        }
        Ok((mean, std))
    }

    /// Standardizes a single row.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or the width differs.
    pub fn transform_row(&self, row: &[f32]) -> Result<Vec<f32>> {
        let (mean, std) = self.fitted_params(row.len())?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &v)| self.scale(v, mean[j], std[j]))
            .collect())
    }

    fn scale(&self, mut val: f32, mean: f32, std: f32) -> f32 {
        if self.with_mean {
            val -= mean;
        }
        if self.with_std && std > MIN_STD {
            val /= std;
        }
        val
    }

    /// Transforms data back to original scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or dimensions mismatch.
    pub fn inverse_transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (n_samples, n_features) = x.shape();
        let (mean, std) = self.fitted_params(n_features)?;

        let mut result = Vec::with_capacity(n_samples * n_features);
        for row in x.rows() {
            for (j, &v) in row.iter().enumerate() {
                let mut val = v;
                if self.with_std && std[j] > MIN_STD {
                    val *= std[j];
                }
                if self.with_mean {
                    val += mean[j];
                }
                result.push(val);
            }
        }

        Matrix::from_vec(n_samples, n_features, result)
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        let mut mean = vec![0.0; n_features];
        for row in x.rows() {
            for (m, &v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n_samples as f32;
        }

        let mut std = vec![0.0; n_features];
        for row in x.rows() {
            for ((s, &v), &m) in std.iter_mut().zip(row).zip(&mean) {
                let diff = v - m;
                *s += diff * diff;
            }
        }
        // Population std (divide by n, not n-1)
        for s in &mut std {
            *s = (*s / n_samples as f32).sqrt();
        }

        self.mean = Some(mean);
        self.std = Some(std);

        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (n_samples, n_features) = x.shape();
        let (mean, std) = self.fitted_params(n_features)?;

        let mut result = Vec::with_capacity(n_samples * n_features);
        for row in x.rows() {
            for (j, &v) in row.iter().enumerate() {
                result.push(self.scale(v, mean[j], std[j]));
            }
        }

        Matrix::from_vec(n_samples, n_features, result)
    }
}

#[cfg(test)]
mod tests;

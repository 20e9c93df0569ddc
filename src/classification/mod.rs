//! Stress classification strategies.
//!
//! - [`SoftmaxRegression`]: multinomial logistic regression trained with
//!   full-batch gradient descent
//! - [`StressModel`]: tagged union over every strategy, selected by
//!   [`ModelKind`]
//!
//! Tree-based and neural strategies live in [`crate::tree`] and [`crate::nn`].
//!
//! # Example
//!
//! ```
//! use stress2health::classification::SoftmaxRegression;
//! use stress2health::prelude::*;
//!
//! let x = Matrix::from_vec(6, 1, vec![-2.0, -1.8, 0.0, 0.1, 1.9, 2.0])
//!     .expect("Matrix dimensions match data length");
//! let y = vec![0, 0, 1, 1, 2, 2];
//!
//! let mut model = SoftmaxRegression::new().with_max_iter(2000);
//! model.fit(&x, &y).expect("Training data is valid");
//! let proba = model.predict_proba(&x).expect("fitted");
//! assert_eq!(proba.shape(), (6, 3));
//! ```

mod strategy;

pub use strategy::{ModelKind, StressModel};

use serde::{Deserialize, Serialize};

use crate::error::{HealthError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;

/// Checks shapes and labels before fitting and returns the class count.
pub(crate) fn check_fit_inputs(x: &Matrix<f32>, y: &[usize]) -> Result<usize> {
    let (n_samples, n_features) = x.shape();
    if n_samples != y.len() {
        return Err("Number of samples in X and y must match".into());
    }
    if n_samples == 0 {
        return Err("Cannot fit with zero samples".into());
    }
    if n_features == 0 {
        return Err("Cannot fit with zero features".into());
    }
    Ok(y.iter().max().map_or(0, |&m| m + 1))
}

/// Checks that `x` has the width the model was fitted on.
pub(crate) fn check_predict_width(x: &Matrix<f32>, n_features: usize) -> Result<()> {
    if x.n_cols() == n_features {
        Ok(())
    } else {
        Err(HealthError::dimension_mismatch(
            "n_features",
            n_features,
            x.n_cols(),
        ))
    }
}

/// Numerically stable softmax, in place.
pub(crate) fn softmax_in_place(logits: &mut [f32]) {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for z in logits.iter_mut() {
        *z = (*z - max).exp();
        sum += *z;
    }
    for z in logits.iter_mut() {
        *z /= sum;
    }
}

/// Multinomial logistic regression.
///
/// Minimises the mean cross-entropy plus an L2 penalty on the weights with
/// full-batch gradient descent. Training stops after `max_iter` steps or once
/// every gradient component is below `tol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxRegression {
    /// Weights, one row per class (`n_classes` × `n_features`)
    weights: Option<Matrix<f32>>,
    /// Per-class intercepts
    intercepts: Vec<f32>,
    learning_rate: f32,
    max_iter: usize,
    tol: f32,
    l2: f32,
}

impl Default for SoftmaxRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftmaxRegression {
    /// Creates a classifier with `learning_rate = 0.1`, `max_iter = 1000`,
    /// `tol = 1e-4` and `l2 = 1e-3`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            weights: None,
            intercepts: Vec::new(),
            learning_rate: 0.1,
            max_iter: 1000,
            tol: 1e-4,
            l2: 1e-3,
        }
    }

    /// Sets the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the L2 penalty strength.
    #[must_use]
    pub fn with_l2(mut self, l2: f32) -> Self {
        self.l2 = l2;
        self
    }

    /// Fitted weights, `None` before fitting.
    #[must_use]
    pub fn weights(&self) -> Option<&Matrix<f32>> {
        self.weights.as_ref()
    }

    /// Fitted per-class intercepts.
    #[must_use]
    pub fn intercepts(&self) -> &[f32] {
        &self.intercepts
    }

    fn validate_hyperparameters(&self) -> Result<()> {
        if !(self.learning_rate > 0.0) {
            return Err(HealthError::InvalidHyperparameter {
                param: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                constraint: "> 0".to_string(),
            });
        }
        if self.max_iter == 0 {
            return Err(HealthError::InvalidHyperparameter {
                param: "max_iter".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if self.l2 < 0.0 {
            return Err(HealthError::InvalidHyperparameter {
                param: "l2".to_string(),
                value: self.l2.to_string(),
                constraint: ">= 0".to_string(),
            });
        }
        Ok(())
    }

    fn row_proba(weights: &Matrix<f32>, intercepts: &[f32], row: &[f32]) -> Vec<f32> {
        let mut logits: Vec<f32> = weights
            .rows()
            .zip(intercepts)
            .map(|(w, &b)| b + w.iter().zip(row).map(|(wi, xi)| wi * xi).sum::<f32>())
            .collect();
        softmax_in_place(&mut logits);
        logits
    }
}

impl Classifier for SoftmaxRegression {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let n_classes = check_fit_inputs(x, y)?;
        self.validate_hyperparameters()?;
        let (n_samples, n_features) = x.shape();
        let n = n_samples as f32;

        let mut weights = Matrix::zeros(n_classes, n_features);
        let mut intercepts = vec![0.0; n_classes];

        for _ in 0..self.max_iter {
            let mut w_grad = Matrix::zeros(n_classes, n_features);
            let mut b_grad = vec![0.0; n_classes];

            for (row, &label) in x.rows().zip(y) {
                let proba = Self::row_proba(&weights, &intercepts, row);
                for (c, p) in proba.iter().enumerate() {
                    let error = p - if c == label { 1.0 } else { 0.0 };
                    b_grad[c] += error;
                    for (j, &xj) in row.iter().enumerate() {
                        w_grad.set(c, j, w_grad.get(c, j) + error * xj);
                    }
                }
            }

            let mut max_grad: f32 = 0.0;
            for c in 0..n_classes {
                let gb = b_grad[c] / n;
                intercepts[c] -= self.learning_rate * gb;
                max_grad = max_grad.max(gb.abs());
                for j in 0..n_features {
                    let gw = w_grad.get(c, j) / n + self.l2 * weights.get(c, j);
                    weights.set(c, j, weights.get(c, j) - self.learning_rate * gw);
                    max_grad = max_grad.max(gw.abs());
                }
            }

            if max_grad < self.tol {
                break;
            }
        }

        self.weights = Some(weights);
        self.intercepts = intercepts;
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        Ok(self.predict_proba(x)?.argmax_rows())
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let weights = self.weights.as_ref().ok_or(HealthError::ModelNotLoaded)?;
        check_predict_width(x, weights.n_cols())?;

        let n_classes = weights.n_rows();
        let mut data = Vec::with_capacity(x.n_rows() * n_classes);
        for row in x.rows() {
            data.extend(Self::row_proba(weights, &self.intercepts, row));
        }
        Matrix::from_vec(x.n_rows(), n_classes, data)
    }

    fn n_classes(&self) -> Option<usize> {
        self.weights.as_ref().map(Matrix::n_rows)
    }
}

#[cfg(test)]
mod tests;

//! Fully connected (linear) layer: y = Wx + b

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::init::kaiming_uniform;
use crate::primitives::Matrix;

/// Fully connected layer with weights of shape `[out_features, in_features]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    weight: Matrix<f32>,
    bias: Vec<f32>,
}

impl Linear {
    /// Creates a layer with Kaiming-uniform weights and zero bias.
    #[must_use]
    pub fn new(in_features: usize, out_features: usize, rng: &mut StdRng) -> Self {
        let mut weight = Matrix::zeros(out_features, in_features);
        weight
            .as_mut_slice()
            .copy_from_slice(&kaiming_uniform(in_features * out_features, in_features, rng));
        Self {
            weight,
            bias: vec![0.0; out_features],
        }
    }

    /// Number of input features.
    #[must_use]
    pub fn in_features(&self) -> usize {
        self.weight.n_cols()
    }

    /// Number of output features.
    #[must_use]
    pub fn out_features(&self) -> usize {
        self.weight.n_rows()
    }

    /// Weight matrix.
    #[must_use]
    pub fn weight(&self) -> &Matrix<f32> {
        &self.weight
    }

    /// Computes `Wx + b` for one input vector.
    #[must_use]
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weight
            .rows()
            .zip(&self.bias)
            .map(|(w, &b)| b + w.iter().zip(input).map(|(wi, xi)| wi * xi).sum::<f32>())
            .collect()
    }

    /// Propagates `delta` (dL/dy) back to the input: `Wᵀ delta`.
    #[must_use]
    pub fn backward_input(&self, delta: &[f32]) -> Vec<f32> {
        let mut grad = vec![0.0; self.in_features()];
        for (w, &d) in self.weight.rows().zip(delta) {
            for (g, &wi) in grad.iter_mut().zip(w) {
                *g += wi * d;
            }
        }
        grad
    }

    /// Mutable parameter buffers: weights then bias.
    pub(crate) fn params_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (self.weight.as_mut_slice(), &mut self.bias)
    }
}

/// Gradient accumulator matching a [`Linear`] layer's parameters.
#[derive(Debug, Clone)]
pub(crate) struct LinearGrad {
    pub weight: Vec<f32>,
    pub bias: Vec<f32>,
    in_features: usize,
}

impl LinearGrad {
    pub fn zeros_like(layer: &Linear) -> Self {
        Self {
            weight: vec![0.0; layer.in_features() * layer.out_features()],
            bias: vec![0.0; layer.out_features()],
            in_features: layer.in_features(),
        }
    }

    /// Adds the outer product `delta ⊗ input` and `delta`.
    pub fn accumulate(&mut self, delta: &[f32], input: &[f32]) {
        for (o, &d) in delta.iter().enumerate() {
            self.bias[o] += d;
            let row = &mut self.weight[o * self.in_features..(o + 1) * self.in_features];
            for (g, &x) in row.iter_mut().zip(input) {
                *g += d * x;
            }
        }
    }

    pub fn scale(&mut self, factor: f32) {
        for g in self.weight.iter_mut().chain(self.bias.iter_mut()) {
            *g *= factor;
        }
    }
}

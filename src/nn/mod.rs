//! Feed-forward neural network classifier.
//!
//! A small multilayer perceptron trained with hand-written backpropagation:
//!
//! ```text
//! input → Linear → ReLU → Dropout → … → Linear → Softmax
//! ```
//!
//! Hidden layers use Kaiming-uniform initialization, the loss is categorical
//! cross-entropy and parameters are updated with [`Adam`] on shuffled
//! mini-batches. Dropout is active only during training.
//!
//! # Example
//!
//! ```
//! use stress2health::nn::MlpClassifier;
//! use stress2health::prelude::*;
//!
//! let x = Matrix::from_vec(4, 1, vec![-1.0, -0.9, 0.9, 1.0]).expect("4x1");
//! let y = vec![0, 0, 1, 1];
//!
//! let mut mlp = MlpClassifier::new()
//!     .with_hidden_layers(vec![8])
//!     .with_dropout(vec![0.0])
//!     .with_epochs(300)
//!     .with_learning_rate(0.01);
//! mlp.fit(&x, &y).expect("fit");
//! assert_eq!(mlp.predict(&x).expect("fitted"), y);
//! ```

mod init;
mod linear;
mod optim;

pub use init::kaiming_uniform;
pub use linear::Linear;
pub use optim::Adam;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::classification::{check_fit_inputs, check_predict_width, softmax_in_place};
use crate::error::{HealthError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;

use linear::LinearGrad;

/// Activations recorded during one forward pass.
struct Trace {
    /// Input to each layer
    inputs: Vec<Vec<f32>>,
    /// Per hidden unit: 0 where ReLU or dropout cut the unit, else the
    /// dropout rescale factor
    gates: Vec<Vec<f32>>,
    proba: Vec<f32>,
}

/// Multilayer perceptron classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpClassifier {
    layers: Vec<Linear>,
    hidden_layers: Vec<usize>,
    /// Dropout rate after each hidden layer
    dropout: Vec<f32>,
    learning_rate: f32,
    epochs: usize,
    batch_size: usize,
    random_state: u64,
    n_features: Option<usize>,
    n_classes: Option<usize>,
    /// Mean training loss per epoch
    loss_history: Vec<f32>,
}

impl Default for MlpClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MlpClassifier {
    /// Creates a `64 → 32 → 16` network with dropout 0.3 and 0.2 after the
    /// first two hidden layers, Adam at `1e-3`, 50 epochs of batch size 8.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            hidden_layers: vec![64, 32, 16],
            dropout: vec![0.3, 0.2, 0.0],
            learning_rate: 1e-3,
            epochs: 50,
            batch_size: 8,
            random_state: 42,
            n_features: None,
            n_classes: None,
            loss_history: Vec::new(),
        }
    }

    /// Sets the hidden layer widths.
    #[must_use]
    pub fn with_hidden_layers(mut self, widths: Vec<usize>) -> Self {
        self.hidden_layers = widths;
        self
    }

    /// Sets the dropout rate after each hidden layer. Missing entries mean 0.
    #[must_use]
    pub fn with_dropout(mut self, rates: Vec<f32>) -> Self {
        self.dropout = rates;
        self
    }

    /// Sets the Adam learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sets the number of passes over the training data.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the mini-batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the seed for initialization, shuffling and dropout.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Fitted layers, input to output.
    #[must_use]
    pub fn layers(&self) -> &[Linear] {
        &self.layers
    }

    /// Mean cross-entropy of each training epoch.
    #[must_use]
    pub fn loss_history(&self) -> &[f32] {
        &self.loss_history
    }

    fn validate_hyperparameters(&self) -> Result<()> {
        let invalid = |param: &str, value: String, constraint: &str| -> Result<()> {
            Err(HealthError::InvalidHyperparameter {
                param: param.to_string(),
                value,
                constraint: constraint.to_string(),
            })
        };
        if !(self.learning_rate > 0.0) {
            return invalid("learning_rate", self.learning_rate.to_string(), "> 0");
        }
        if self.epochs == 0 {
            return invalid("epochs", "0".to_string(), ">= 1");
        }
        if self.batch_size == 0 {
            return invalid("batch_size", "0".to_string(), ">= 1");
        }
        if self.hidden_layers.contains(&0) {
            return invalid("hidden_layers", format!("{:?}", self.hidden_layers), "all widths >= 1");
        }
        if let Some(&rate) = self.dropout.iter().find(|&&r| !(0.0..1.0).contains(&r)) {
            return invalid("dropout", rate.to_string(), "0 <= rate < 1");
        }
        Ok(())
    }

    fn forward(&self, x: &[f32], mut dropout_rng: Option<&mut StdRng>) -> Trace {
        let last = self.layers.len().saturating_sub(1);
        let mut inputs = Vec::with_capacity(self.layers.len());
        let mut gates = Vec::with_capacity(last);
        let mut a = x.to_vec();

        for (l, layer) in self.layers.iter().enumerate() {
            let z = layer.forward(&a);
            inputs.push(std::mem::replace(&mut a, z));
            if l == last {
                break;
            }

            let rate = self.dropout.get(l).copied().unwrap_or(0.0);
            let gate: Vec<f32> = a
                .iter()
                .map(|&z| {
                    if z <= 0.0 {
                        return 0.0;
                    }
                    match dropout_rng.as_deref_mut() {
                        Some(rng) if rate > 0.0 => {
                            if rng.gen::<f32>() < rate {
                                0.0
                            } else {
                                1.0 / (1.0 - rate)
                            }
                        }
                        _ => 1.0,
                    }
                })
                .collect();
            for (v, g) in a.iter_mut().zip(&gate) {
                *v *= g;
            }
            gates.push(gate);
        }

        softmax_in_place(&mut a);
        Trace {
            inputs,
            gates,
            proba: a,
        }
    }

    /// Accumulates gradients for one sample and returns its loss.
    fn backprop(&self, trace: &Trace, label: usize, grads: &mut [LinearGrad]) -> f32 {
        let loss = -trace.proba[label].max(1e-12).ln();

        let mut delta = trace.proba.clone();
        delta[label] -= 1.0;
        for l in (0..self.layers.len()).rev() {
            grads[l].accumulate(&delta, &trace.inputs[l]);
            if l > 0 {
                let mut back = self.layers[l].backward_input(&delta);
                for (b, g) in back.iter_mut().zip(&trace.gates[l - 1]) {
                    *b *= g;
                }
                delta = back;
            }
        }
        loss
    }
}

impl Classifier for MlpClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let n_classes = check_fit_inputs(x, y)?;
        self.validate_hyperparameters()?;
        let (n_samples, n_features) = x.shape();

        let mut rng = StdRng::seed_from_u64(self.random_state);
        let mut widths = Vec::with_capacity(self.hidden_layers.len() + 2);
        widths.push(n_features);
        widths.extend_from_slice(&self.hidden_layers);
        widths.push(n_classes);
        self.layers = widths
            .windows(2)
            .map(|w| Linear::new(w[0], w[1], &mut rng))
            .collect();
        self.loss_history = Vec::with_capacity(self.epochs);

        let mut optimizer = Adam::new(self.learning_rate);
        let mut order: Vec<usize> = (0..n_samples).collect();

        for epoch in 0..self.epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0;

            for batch in order.chunks(self.batch_size) {
                let mut grads: Vec<LinearGrad> =
                    self.layers.iter().map(LinearGrad::zeros_like).collect();
                for &i in batch {
                    let trace = self.forward(x.row(i), Some(&mut rng));
                    epoch_loss += self.backprop(&trace, y[i], &mut grads);
                }

                optimizer.begin_step();
                let scale = 1.0 / batch.len() as f32;
                for (l, (layer, grad)) in self.layers.iter_mut().zip(grads.iter_mut()).enumerate() {
                    grad.scale(scale);
                    let (weight, bias) = layer.params_mut();
                    optimizer.update(2 * l, weight, &grad.weight);
                    optimizer.update(2 * l + 1, bias, &grad.bias);
                }
            }

            let mean_loss = epoch_loss / n_samples as f32;
            tracing::debug!(epoch, loss = mean_loss, "mlp epoch finished");
            self.loss_history.push(mean_loss);
        }

        self.n_features = Some(n_features);
        self.n_classes = Some(n_classes);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        Ok(self.predict_proba(x)?.argmax_rows())
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (Some(n_features), Some(n_classes)) = (self.n_features, self.n_classes) else {
            return Err(HealthError::ModelNotLoaded);
        };
        check_predict_width(x, n_features)?;

        let mut data = Vec::with_capacity(x.n_rows() * n_classes);
        for row in x.rows() {
            data.extend(self.forward(row, None).proba);
        }
        Matrix::from_vec(x.n_rows(), n_classes, data)
    }

    fn n_classes(&self) -> Option<usize> {
        self.n_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_blobs() -> (Matrix<f32>, Vec<usize>) {
        let mut data = Vec::new();
        let mut labels = Vec::new();
        let centers = [(-2.0_f32, -2.0_f32), (0.0, 2.0), (2.0, -2.0)];
        for (class, &(cx, cy)) in centers.iter().enumerate() {
            for k in 0..8 {
                let jitter = (k as f32 - 3.5) * 0.05;
                data.extend_from_slice(&[cx + jitter, cy - jitter]);
                labels.push(class);
            }
        }
        (Matrix::from_vec(24, 2, data).expect("24x2"), labels)
    }

    #[test]
    fn test_default_architecture() {
        let (x, y) = three_blobs();
        let mut mlp = MlpClassifier::new().with_epochs(1);
        mlp.fit(&x, &y).expect("fit");
        let shapes: Vec<(usize, usize)> = mlp
            .layers()
            .iter()
            .map(|l| (l.in_features(), l.out_features()))
            .collect();
        assert_eq!(shapes, vec![(2, 64), (64, 32), (32, 16), (16, 3)]);
    }

    #[test]
    fn test_learns_separable_blobs() {
        let (x, y) = three_blobs();
        let mut mlp = MlpClassifier::new()
            .with_epochs(100)
            .with_learning_rate(0.01);
        mlp.fit(&x, &y).expect("fit");
        let acc = mlp.score(&x, &y).expect("fitted");
        assert!(acc > 0.9, "accuracy {acc}");
    }

    #[test]
    fn test_loss_decreases() {
        let (x, y) = three_blobs();
        let mut mlp = MlpClassifier::new().with_epochs(30).with_learning_rate(0.01);
        mlp.fit(&x, &y).expect("fit");
        let history = mlp.loss_history();
        assert_eq!(history.len(), 30);
        assert!(history[29] < history[0]);
    }

    #[test]
    fn test_proba_rows_sum_to_one() {
        let (x, y) = three_blobs();
        let mut mlp = MlpClassifier::new().with_epochs(3);
        mlp.fit(&x, &y).expect("fit");
        let proba = mlp.predict_proba(&x).expect("fitted");
        for row in proba.rows() {
            assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_inference_is_deterministic() {
        let (x, y) = three_blobs();
        let mut mlp = MlpClassifier::new().with_epochs(2);
        mlp.fit(&x, &y).expect("fit");
        assert_eq!(
            mlp.predict_proba(&x).expect("fitted"),
            mlp.predict_proba(&x).expect("fitted")
        );
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = three_blobs();
        let mut a = MlpClassifier::new().with_epochs(2).with_random_state(9);
        let mut b = MlpClassifier::new().with_epochs(2).with_random_state(9);
        a.fit(&x, &y).expect("fit a");
        b.fit(&x, &y).expect("fit b");
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_hyperparameters() {
        let (x, y) = three_blobs();
        for mut bad in [
            MlpClassifier::new().with_epochs(0),
            MlpClassifier::new().with_batch_size(0),
            MlpClassifier::new().with_dropout(vec![1.0]),
            MlpClassifier::new().with_hidden_layers(vec![4, 0]),
        ] {
            assert!(matches!(
                bad.fit(&x, &y),
                Err(HealthError::InvalidHyperparameter { .. })
            ));
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let mlp = MlpClassifier::new();
        assert!(matches!(
            mlp.predict(&Matrix::zeros(1, 4)),
            Err(HealthError::ModelNotLoaded)
        ));
    }
}

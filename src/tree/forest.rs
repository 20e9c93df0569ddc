//! Random forest over bootstrap samples.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::helpers::bootstrap_sample;
use super::DecisionTreeClassifier;
use crate::classification::{check_fit_inputs, check_predict_width};
use crate::error::{HealthError, Result};
use crate::primitives::{argmax, Matrix};
use crate::traits::Classifier;

/// Random forest classifier.
///
/// Tree `i` is grown on a bootstrap sample drawn from a generator seeded with
/// `random_state + i`, considering `max_features` random features per split
/// (√d by default). Probabilities are the mean of the trees' leaf
/// distributions and the prediction is their arg-max.
///
/// # Example
///
/// ```
/// use stress2health::prelude::*;
/// use stress2health::tree::RandomForestClassifier;
///
/// let x = Matrix::from_vec(6, 1, vec![0.0, 0.2, 0.4, 5.0, 5.2, 5.4]).expect("6x1");
/// let y = vec![0, 0, 0, 1, 1, 1];
///
/// let mut forest = RandomForestClassifier::new(10).with_random_state(7);
/// forest.fit(&x, &y).expect("fit");
/// let proba = forest.predict_proba(&x).expect("fitted");
/// assert_eq!(proba.shape(), (6, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    max_features: Option<usize>,
    random_state: u64,
    n_features: Option<usize>,
    n_classes: Option<usize>,
    /// Out-of-bag accuracy measured during fit
    oob_score: Option<f32>,
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForestClassifier {
    /// Creates a forest of `n_estimators` unlimited-depth trees seeded with 42.
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            max_features: None,
            random_state: 42,
            n_features: None,
            n_classes: None,
            oob_score: None,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the number of features considered per split.
    #[must_use]
    pub fn with_max_features(mut self, k: usize) -> Self {
        self.max_features = Some(k);
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    /// Number of fitted trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Out-of-bag accuracy, `None` before fitting or when no sample was ever
    /// left out of a bootstrap draw.
    #[must_use]
    pub fn oob_score(&self) -> Option<f32> {
        self.oob_score
    }

    fn features_per_split(&self, n_features: usize) -> usize {
        self.max_features
            .unwrap_or_else(|| (n_features as f32).sqrt() as usize)
            .clamp(1, n_features)
    }

    fn row_proba(&self, row: &[f32], n_classes: usize) -> Result<Vec<f32>> {
        let mut acc = vec![0.0; n_classes];
        for tree in &self.trees {
            for (a, p) in acc.iter_mut().zip(tree.predict_row_proba(row)?) {
                *a += p;
            }
        }
        let n_trees = self.trees.len() as f32;
        for a in &mut acc {
            *a /= n_trees;
        }
        Ok(acc)
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let n_classes = check_fit_inputs(x, y)?;
        if self.n_estimators == 0 {
            return Err(HealthError::InvalidHyperparameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        let (n_samples, n_features) = x.shape();
        let k = self.features_per_split(n_features);

        let mut trees = Vec::with_capacity(self.n_estimators);
        let mut oob_votes = Matrix::zeros(n_samples, n_classes);
        let mut oob_seen = vec![false; n_samples];

        for i in 0..self.n_estimators {
            let mut rng = StdRng::seed_from_u64(self.random_state.wrapping_add(i as u64));
            let bootstrap = bootstrap_sample(n_samples, &mut rng);

            let mut tree = DecisionTreeClassifier::new().with_max_features(k);
            if let Some(depth) = self.max_depth {
                tree = tree.with_max_depth(depth);
            }
            tree.fit_subset(x, y, &bootstrap, n_classes, &mut rng)?;

            let mut in_bag = vec![false; n_samples];
            for &idx in &bootstrap {
                in_bag[idx] = true;
            }
            for idx in (0..n_samples).filter(|&i| !in_bag[i]) {
                let dist = tree.predict_row_proba(x.row(idx))?;
                for (c, p) in dist.iter().enumerate() {
                    oob_votes.set(idx, c, oob_votes.get(idx, c) + p);
                }
                oob_seen[idx] = true;
            }

            trees.push(tree);
        }

        let scored: Vec<usize> = (0..n_samples).filter(|&i| oob_seen[i]).collect();
        self.oob_score = if scored.is_empty() {
            None
        } else {
            let correct = scored
                .iter()
                .filter(|&&i| argmax(oob_votes.row(i)) == y[i])
                .count();
            Some(correct as f32 / scored.len() as f32)
        };

        self.trees = trees;
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
            data.extend(self.row_proba(row, n_classes)?);
        }
        Matrix::from_vec(x.n_rows(), n_classes, data)
    }

    fn n_classes(&self) -> Option<usize> {
        self.n_classes
    }
}

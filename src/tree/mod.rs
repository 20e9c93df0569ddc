//! Decision tree and random forest classifiers.
//!
//! - CART (Classification and Regression Trees) using Gini impurity
//! - Random Forest over bootstrap samples with random feature subsets
//!
//! Leaves keep the class distribution of the training samples that reached
//! them, so both models can report probabilities as well as labels.
//!
//! # Example
//!
//! ```
//! use stress2health::prelude::*;
//! use stress2health::tree::DecisionTreeClassifier;
//!
//! let x = Matrix::from_vec(4, 2, vec![
//!     0.0, 0.0,  // class 0
//!     0.0, 1.0,  // class 0
//!     1.0, 0.0,  // class 1
//!     1.0, 1.0,  // class 1
//! ]).expect("Matrix creation should succeed");
//! let y = vec![0, 0, 1, 1];
//!
//! let mut tree = DecisionTreeClassifier::new().with_max_depth(3);
//! tree.fit(&x, &y).expect("fit should succeed");
//! assert_eq!(tree.predict(&x).expect("fitted"), y);
//! ```

mod forest;
mod helpers;

pub use forest::RandomForestClassifier;
pub use helpers::gini_impurity;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::classification::{check_fit_inputs, check_predict_width};
use crate::error::{HealthError, Result};
use crate::primitives::{argmax, Matrix};
use crate::traits::Classifier;

use helpers::{candidate_features, class_counts, distribution, find_best_split, partition};

/// Internal node in a decision tree.
///
/// Contains a split condition (feature and threshold) and pointers to
/// left and right subtrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Fraction of training samples of each class that reached this leaf
    pub distribution: Vec<f32>,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

impl Leaf {
    /// Majority class; ties go to the lowest class index.
    #[must_use]
    pub fn class_label(&self) -> usize {
        argmax(&self.distribution)
    }
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class distribution
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Number of leaves under this node.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Node(node) => node.left.n_leaves() + node.right.n_leaves(),
        }
    }

    /// Follows the split conditions down to the leaf for `row`.
    #[must_use]
    pub fn leaf_for(&self, row: &[f32]) -> &Leaf {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf,
                TreeNode::Node(internal) => {
                    node = if row[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity as the splitting criterion and builds trees recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    /// Features considered per split; `None` means all of them
    max_features: Option<usize>,
    random_state: u64,
    n_features: Option<usize>,
    n_classes: Option<usize>,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

struct TreeBuilder<'a> {
    x: &'a Matrix<f32>,
    y: &'a [usize],
    n_classes: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: Option<usize>,
}

impl TreeBuilder<'_> {
    fn grow(&self, indices: &[usize], depth: usize, rng: &mut StdRng) -> TreeNode {
        let counts = class_counts(self.y, indices, self.n_classes);
        let make_leaf = || {
            TreeNode::Leaf(Leaf {
                distribution: distribution(&counts),
                n_samples: indices.len(),
            })
        };

        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let at_max_depth = self.max_depth.is_some_and(|d| depth >= d);
        if is_pure || at_max_depth || indices.len() < self.min_samples_split {
            return make_leaf();
        }

        let features = candidate_features(self.x.n_cols(), self.max_features, rng);
        let Some(split) = find_best_split(self.x, self.y, indices, &features, self.n_classes)
        else {
            return make_leaf();
        };

        let (left, right) = partition(self.x, indices, split.feature_idx, split.threshold);
        if left.is_empty() || right.is_empty() {
            return make_leaf();
        }

        TreeNode::Node(Node {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left: Box::new(self.grow(&left, depth + 1, rng)),
            right: Box::new(self.grow(&right, depth + 1, rng)),
        })
    }
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with unlimited depth.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            random_state: 42,
            n_features: None,
            n_classes: None,
        }
    }

    /// Sets the maximum depth of the tree (root has depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum number of samples required to split a node.
    #[must_use]
    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }

    /// Limits each split to a random subset of `k` features.
    #[must_use]
    pub fn with_max_features(mut self, k: usize) -> Self {
        self.max_features = Some(k);
        self
    }

    /// Sets the seed used for feature subsampling.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// The fitted tree, `None` before fitting.
    #[must_use]
    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    /// Depth of the fitted tree.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.tree.as_ref().map(TreeNode::depth)
    }

    fn validate_hyperparameters(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(HealthError::InvalidHyperparameter {
                param: "min_samples_split".to_string(),
                value: self.min_samples_split.to_string(),
                constraint: ">= 2".to_string(),
            });
        }
        if self.max_features == Some(0) {
            return Err(HealthError::InvalidHyperparameter {
                param: "max_features".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        Ok(())
    }

    /// Grows the tree on a subset of rows with a fixed class count.
    ///
    /// Used by the forest so every tree reports distributions of the same
    /// width even when its bootstrap sample misses a class.
    pub(crate) fn fit_subset(
        &mut self,
        x: &Matrix<f32>,
        y: &[usize],
        indices: &[usize],
        n_classes: usize,
        rng: &mut StdRng,
    ) -> Result<()> {
        self.validate_hyperparameters()?;
        if indices.is_empty() {
            return Err("Cannot fit with zero samples".into());
        }
        let builder = TreeBuilder {
            x,
            y,
            n_classes,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: self.max_features,
        };
        self.tree = Some(builder.grow(indices, 0, rng));
        self.n_features = Some(x.n_cols());
        self.n_classes = Some(n_classes);
        Ok(())
    }

    /// Class distribution of the leaf a single row falls into.
    ///
    /// # Errors
    ///
    /// Returns `ModelNotLoaded` before fitting or a dimension error for a row
    /// of the wrong width.
    pub fn predict_row_proba(&self, row: &[f32]) -> Result<&[f32]> {
        let tree = self.tree.as_ref().ok_or(HealthError::ModelNotLoaded)?;
        let expected = self.n_features.unwrap_or(0);
        if row.len() != expected {
            return Err(HealthError::dimension_mismatch("n_features", expected, row.len()));
        }
        Ok(&tree.leaf_for(row).distribution)
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let n_classes = check_fit_inputs(x, y)?;
        let indices: Vec<usize> = (0..x.n_rows()).collect();
        let mut rng = StdRng::seed_from_u64(self.random_state);
        self.fit_subset(x, y, &indices, n_classes, &mut rng)
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let tree = self.tree.as_ref().ok_or(HealthError::ModelNotLoaded)?;
        check_predict_width(x, self.n_features.unwrap_or(0))?;
        Ok(x.rows().map(|row| tree.leaf_for(row).class_label()).collect())
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let tree = self.tree.as_ref().ok_or(HealthError::ModelNotLoaded)?;
        check_predict_width(x, self.n_features.unwrap_or(0))?;
        let n_classes = self.n_classes.unwrap_or(0);
        let mut data = Vec::with_capacity(x.n_rows() * n_classes);
        for row in x.rows() {
            data.extend_from_slice(&tree.leaf_for(row).distribution);
        }
        Matrix::from_vec(x.n_rows(), n_classes, data)
    }

    fn n_classes(&self) -> Option<usize> {
        self.n_classes
    }
}

//! Strategy selection for the stress classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SoftmaxRegression;
use crate::error::{HealthError, Result};
use crate::nn::MlpClassifier;
use crate::primitives::Matrix;
use crate::traits::Classifier;
use crate::tree::{DecisionTreeClassifier, RandomForestClassifier};

/// Names a classification strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Multinomial logistic regression
    #[default]
    Logistic,
    /// Single CART tree
    DecisionTree,
    /// Bagged CART trees
    RandomForest,
    /// Feed-forward neural network
    Neural,
}

impl ModelKind {
    /// Every kind, in declaration order.
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Logistic,
        ModelKind::DecisionTree,
        ModelKind::RandomForest,
        ModelKind::Neural,
    ];

    /// Stable lowercase name used in config files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Logistic => "logistic",
            ModelKind::DecisionTree => "decision_tree",
            ModelKind::RandomForest => "random_forest",
            ModelKind::Neural => "neural",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| HealthError::InvalidHyperparameter {
                param: "model".to_string(),
                value: s.to_string(),
                constraint: "one of logistic, decision_tree, random_forest, neural".to_string(),
            })
    }
}

/// A stress classifier of any supported kind.
///
/// Dispatches [`Classifier`] to the wrapped strategy, so the facade, the
/// bundle and the CLI never need to know which one is in use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StressModel {
    /// Softmax regression
    Logistic(SoftmaxRegression),
    /// CART decision tree
    DecisionTree(DecisionTreeClassifier),
    /// Random forest
    RandomForest(RandomForestClassifier),
    /// Multi-layer perceptron
    Neural(MlpClassifier),
}

impl StressModel {
    /// Which strategy this is.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self {
            StressModel::Logistic(_) => ModelKind::Logistic,
            StressModel::DecisionTree(_) => ModelKind::DecisionTree,
            StressModel::RandomForest(_) => ModelKind::RandomForest,
            StressModel::Neural(_) => ModelKind::Neural,
        }
    }

    fn as_classifier(&self) -> &dyn Classifier {
        match self {
            StressModel::Logistic(m) => m,
            StressModel::DecisionTree(m) => m,
            StressModel::RandomForest(m) => m,
            StressModel::Neural(m) => m,
        }
    }

    fn as_classifier_mut(&mut self) -> &mut dyn Classifier {
        match self {
            StressModel::Logistic(m) => m,
            StressModel::DecisionTree(m) => m,
            StressModel::RandomForest(m) => m,
            StressModel::Neural(m) => m,
        }
    }
}

impl Classifier for StressModel {
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        self.as_classifier_mut().fit(x, y)
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        self.as_classifier().predict(x)
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.as_classifier().predict_proba(x)
    }

    fn n_classes(&self) -> Option<usize> {
        self.as_classifier().n_classes()
    }
}

//! Training configuration.
//!
//! Every hyper-parameter has a default matching the reference training
//! script, so an empty TOML file is a valid configuration. Sections that are
//! not relevant to the selected model are ignored.
//!
//! ```toml
//! model = "random_forest"
//! random_state = 7
//!
//! [forest]
//! n_estimators = 200
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classification::{ModelKind, SoftmaxRegression, StressModel};
use crate::error::{HealthError, Result};
use crate::model_selection::{DEFAULT_RANDOM_STATE, DEFAULT_TEST_SIZE};
use crate::nn::MlpClassifier;
use crate::tree::{DecisionTreeClassifier, RandomForestClassifier};

/// Environment variable overriding [`TrainingConfig::model`].
pub const ENV_MODEL: &str = "S2H_MODEL";
/// Environment variable overriding [`TrainingConfig::random_state`].
pub const ENV_RANDOM_STATE: &str = "S2H_RANDOM_STATE";

/// Softmax regression settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    /// Gradient descent step size
    pub learning_rate: f32,
    /// Maximum number of full-batch iterations
    pub max_iter: usize,
    /// Stop once every gradient component is below this
    pub tol: f32,
    /// L2 penalty on the weights
    pub l2: f32,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 1000,
            tol: 1e-4,
            l2: 1e-3,
        }
    }
}

/// Decision tree settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum depth; `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Minimum samples needed to split a node
    pub min_samples_split: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(5),
            min_samples_split: 2,
        }
    }
}

/// Random forest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Features per split; `None` means √d
    pub max_features: Option<usize>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            max_features: None,
        }
    }
}

/// Neural network settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuralConfig {
    /// Hidden layer widths
    pub hidden_layers: Vec<usize>,
    /// Dropout after each hidden layer
    pub dropout: Vec<f32>,
    /// Adam learning rate
    pub learning_rate: f32,
    /// Training epochs
    pub epochs: usize,
    /// Mini-batch size
    pub batch_size: usize,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![64, 32, 16],
            dropout: vec![0.3, 0.2, 0.0],
            learning_rate: 1e-3,
            epochs: 50,
            batch_size: 8,
        }
    }
}

/// Everything needed to train a stress classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Which strategy to train
    pub model: ModelKind,
    /// Held-out fraction for evaluation
    pub test_size: f32,
    /// Seed for the split and every seeded model
    pub random_state: u64,
    /// Softmax regression settings
    pub logistic: LogisticConfig,
    /// Decision tree settings
    pub tree: TreeConfig,
    /// Random forest settings
    pub forest: ForestConfig,
    /// Neural network settings
    pub neural: NeuralConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            test_size: DEFAULT_TEST_SIZE,
            random_state: DEFAULT_RANDOM_STATE,
            logistic: LogisticConfig::default(),
            tree: TreeConfig::default(),
            forest: ForestConfig::default(),
            neural: NeuralConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Default configuration for the given model.
    #[must_use]
    pub fn for_model(model: ModelKind) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    /// Sets the model kind.
    #[must_use]
    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    /// Sets the random state.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::Config`] if the TOML is malformed or has fields
    /// of the wrong type.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| HealthError::Config {
            message: format!("Failed to parse TOML: {e}"),
        })
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| HealthError::Config {
            message: format!("Failed to read config file '{}': {e}", path.display()),
        })?;
        toml::from_str(&contents).map_err(|e| HealthError::Config {
            message: format!("Failed to parse TOML in '{}': {e}", path.display()),
        })
    }

    /// Serializes configuration to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| HealthError::Config {
            message: format!("Failed to serialize to TOML: {e}"),
        })
    }

    /// Applies `S2H_MODEL` and `S2H_RANDOM_STATE` when they are set and
    /// parse. Unparseable values are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var(ENV_MODEL) {
            match val.parse() {
                Ok(kind) => self.model = kind,
                Err(e) => tracing::warn!(%val, error = %e, "ignoring {ENV_MODEL}"),
            }
        }
        if let Ok(val) = std::env::var(ENV_RANDOM_STATE) {
            match val.parse() {
                Ok(seed) => self.random_state = seed,
                Err(e) => tracing::warn!(%val, error = %e, "ignoring {ENV_RANDOM_STATE}"),
            }
        }
        self
    }

    /// Checks value ranges, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::Config`] naming the offending section and key.
    pub fn validate(&self) -> Result<()> {
        let fail = |key: &str, msg: String| -> Result<()> {
            Err(HealthError::Config {
                message: format!("{key}: {msg}"),
            })
        };
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return fail("test_size", format!("{} not in (0, 1)", self.test_size));
        }
        if !(self.logistic.learning_rate > 0.0) {
            return fail("[logistic] learning_rate", "must be > 0".to_string());
        }
        if self.logistic.max_iter == 0 {
            return fail("[logistic] max_iter", "must be >= 1".to_string());
        }
        if self.tree.min_samples_split < 2 {
            return fail("[tree] min_samples_split", "must be >= 2".to_string());
        }
        if self.forest.n_estimators == 0 {
            return fail("[forest] n_estimators", "must be >= 1".to_string());
        }
        if self.forest.max_features == Some(0) {
            return fail("[forest] max_features", "must be >= 1".to_string());
        }
        if self.neural.epochs == 0 || self.neural.batch_size == 0 {
            return fail("[neural] epochs/batch_size", "must be >= 1".to_string());
        }
        if self.neural.dropout.iter().any(|r| !(0.0..1.0).contains(r)) {
            return fail("[neural] dropout", "rates must be in [0, 1)".to_string());
        }
        Ok(())
    }

    /// Builds an untrained model of the configured kind.
    #[must_use]
    pub fn build_model(&self) -> StressModel {
        match self.model {
            ModelKind::Logistic => StressModel::Logistic(
                SoftmaxRegression::new()
                    .with_learning_rate(self.logistic.learning_rate)
                    .with_max_iter(self.logistic.max_iter)
                    .with_tolerance(self.logistic.tol)
                    .with_l2(self.logistic.l2),
            ),
            ModelKind::DecisionTree => {
                let mut tree = DecisionTreeClassifier::new()
                    .with_min_samples_split(self.tree.min_samples_split)
                    .with_random_state(self.random_state);
                if let Some(depth) = self.tree.max_depth {
                    tree = tree.with_max_depth(depth);
                }
                StressModel::DecisionTree(tree)
            }
            ModelKind::RandomForest => {
                let mut forest = RandomForestClassifier::new(self.forest.n_estimators)
                    .with_random_state(self.random_state);
                if let Some(depth) = self.forest.max_depth {
                    forest = forest.with_max_depth(depth);
                }
                if let Some(k) = self.forest.max_features {
                    forest = forest.with_max_features(k);
                }
                StressModel::RandomForest(forest)
            }
            ModelKind::Neural => StressModel::Neural(
                MlpClassifier::new()
                    .with_hidden_layers(self.neural.hidden_layers.clone())
                    .with_dropout(self.neural.dropout.clone())
                    .with_learning_rate(self.neural.learning_rate)
                    .with_epochs(self.neural.epochs)
                    .with_batch_size(self.neural.batch_size)
                    .with_random_state(self.random_state),
            ),
        }
    }
}

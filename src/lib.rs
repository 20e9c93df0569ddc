//! stress2health: lifestyle stress classification and rule-based disease
//! risk guidance.
//!
//! A trained classifier maps four lifestyle features to a stress level; a
//! deterministic rule engine turns that level plus BMI, activity and sleep
//! into five disease risk levels, and a guidance resolver picks preventive
//! advice for them. Output is educational, not diagnostic.
//!
//! # Quick Start
//!
//! ```
//! use stress2health::prelude::*;
//!
//! let assessment = comprehensive_assessment(Level::High, 31.5, Level::Low, 4.5);
//! assert_eq!(assessment.obesity_risk, RiskLevel::High);
//!
//! let bundle = guide(&assessment);
//! assert_eq!(bundle.high_priority.len(), 5);
//! assert!(bundle.stress_tips.len() <= 5);
//! ```
//!
//! # Modules
//!
//! - [`encoder`]: categorical levels, validated samples and feature encoding
//! - [`primitives`]: row-major `Matrix`
//! - [`preprocessing`]: `StandardScaler` and `LabelEncoder`
//! - [`model_selection`]: seeded train/test split
//! - [`metrics`]: accuracy, confusion matrix, per-class report
//! - [`classification`]: softmax regression and strategy selection
//! - [`tree`]: CART decision tree and random forest
//! - [`nn`]: multilayer perceptron with Adam
//! - [`dataset`]: labelled CSV loading
//! - [`config`]: training hyper-parameters from TOML
//! - [`stress`]: the `StressClassifier` facade
//! - [`serialization`]: checksummed, fingerprinted artifact bundle
//! - [`risk`]: disease risk rules
//! - [`guidance`]: recommendation tables
//! - [`text`]: keyword stress heuristic for free text
//! - [`pipeline`]: end-to-end `HealthPipeline`

pub mod classification;
pub mod config;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod guidance;
pub mod metrics;
pub mod model_selection;
pub mod nn;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod risk;
pub mod serialization;
pub mod stress;
pub mod text;
pub mod traits;
pub mod tree;

pub use error::{HealthError, Result};
pub use primitives::Matrix;
pub use traits::{Classifier, Transformer};

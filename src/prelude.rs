//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use stress2health::prelude::*;
//! ```

pub use crate::classification::{ModelKind, StressModel};
pub use crate::config::TrainingConfig;
pub use crate::dataset::LabeledSample;
pub use crate::encoder::{encode, FeatureVector, Level, LifestyleSample};
pub use crate::error::HealthError;
pub use crate::guidance::{guide, quick_tips, GuidanceBundle};
pub use crate::pipeline::{HealthPipeline, HealthReport};
pub use crate::preprocessing::{LabelEncoder, StandardScaler};
pub use crate::primitives::Matrix;
pub use crate::risk::{comprehensive_assessment, BmiCategory, Disease, RiskAssessment, RiskLevel};
pub use crate::stress::{StressClassifier, TrainingMetrics};
pub use crate::text::TextStressClassifier;
pub use crate::traits::{Classifier, Transformer};
pub use crate::tree::{DecisionTreeClassifier, RandomForestClassifier};

//! Stress classifier facade.
//!
//! Owns the fitted model together with the scaler and label map it was
//! trained with, so inference always sees the train-time transform.
//!
//! # Example
//!
//! ```
//! use stress2health::prelude::*;
//!
//! let mut samples = Vec::new();
//! for i in 0..30 {
//!     let t = i as f32 / 10.0;
//!     samples.push(LabeledSample::with_level(
//!         LifestyleSample::new(4.0 + t * 0.1, 27.0, Level::Low, 12.0, Level::Low).expect("valid"),
//!         Level::High,
//!     ));
//!     samples.push(LabeledSample::with_level(
//!         LifestyleSample::new(8.0 + t * 0.1, 22.0, Level::High, 6.0, Level::High).expect("valid"),
//!         Level::Low,
//!     ));
//! }
//!
//! let mut classifier = StressClassifier::new(TrainingConfig::default());
//! let metrics = classifier.train(&samples).expect("train");
//! assert!(metrics.accuracy > 0.9);
//!
//! let tired = LifestyleSample::new(4.5, 28.0, Level::Low, 11.0, Level::Low).expect("valid");
//! assert_eq!(classifier.predict(&tired).expect("trained"), Level::High);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classification::ModelKind;
use crate::config::TrainingConfig;
use crate::dataset::LabeledSample;
use crate::encoder::{encode, encode_raw, FeatureVector, Level, LifestyleSample, N_FEATURES};
use crate::error::{HealthError, Result};
use crate::metrics::{accuracy, classification_report, confusion_matrix, ClassificationReport};
use crate::model_selection::train_test_split;
use crate::preprocessing::{LabelEncoder, StandardScaler};
use crate::primitives::{argmax, Matrix};
use crate::serialization::{Fingerprint, ModelBundle};
use crate::traits::{Classifier, Transformer};

/// Outcome of [`StressClassifier::train`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Strategy that was trained
    pub model_kind: ModelKind,
    /// Accuracy on the held-out split
    pub accuracy: f32,
    /// Total samples
    pub n_samples: usize,
    /// Training split size
    pub n_train: usize,
    /// Held-out split size
    pub n_test: usize,
    /// Class labels in index order
    pub classes: Vec<String>,
    /// Per-class precision, recall and F1 on the held-out split
    pub report: ClassificationReport,
    /// Held-out confusion counts, rows are true classes
    pub confusion: Matrix<usize>,
}

impl fmt::Display for TrainingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model:    {}", self.model_kind)?;
        writeln!(
            f,
            "Samples:  {} ({} train / {} test)",
            self.n_samples, self.n_train, self.n_test
        )?;
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f)?;
        write!(f, "{}", self.report)
    }
}

/// Lifestyle → stress level classifier.
#[derive(Debug, Clone)]
pub struct StressClassifier {
    config: TrainingConfig,
    bundle: Option<ModelBundle>,
}

impl Default for StressClassifier {
    fn default() -> Self {
        Self::new(TrainingConfig::default())
    }
}

impl StressClassifier {
    /// Creates an untrained classifier.
    #[must_use]
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            bundle: None,
        }
    }

    /// Wraps an already fitted bundle.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ArtifactMismatch`] if the bundle is inconsistent.
    pub fn from_bundle(bundle: ModelBundle, config: TrainingConfig) -> Result<Self> {
        bundle.validate()?;
        let config = config.with_model(bundle.model.kind());
        Ok(Self {
            config,
            bundle: Some(bundle),
        })
    }

    /// Training configuration.
    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// The fitted bundle, if any.
    #[must_use]
    pub fn bundle(&self) -> Option<&ModelBundle> {
        self.bundle.as_ref()
    }

    /// Whether a model has been trained or loaded.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.bundle.is_some()
    }

    /// Strategy in use.
    #[must_use]
    pub fn model_kind(&self) -> ModelKind {
        self.config.model
    }

    /// Class labels in index order, empty before training.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        self.bundle
            .as_ref()
            .map(|b| b.labels.classes())
            .unwrap_or_default()
    }

    /// Fits label map, scaler and model, and evaluates on a held-out split.
    ///
    /// The scaler only sees the training split.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, fewer than two distinct labels
    /// are present, the split leaves a side empty or the training split is
    /// missing a class.
    pub fn train(&mut self, samples: &[LabeledSample]) -> Result<TrainingMetrics> {
        self.config.validate()?;

        let mut labels = LabelEncoder::new();
        let raw_labels: Vec<&str> = samples.iter().map(|s| s.label.as_str()).collect();
        let y = labels.fit_transform(&raw_labels)?;
        if labels.n_classes() < 2 {
            return Err(HealthError::InvalidHyperparameter {
                param: "stress_level".to_string(),
                value: labels.classes().join(", "),
                constraint: "at least two distinct labels".to_string(),
            });
        }

        let features: Vec<FeatureVector> = samples.iter().map(|s| encode(&s.sample)).collect();
        let x = Matrix::from_rows(&features)?;
        let split = train_test_split(&x, &y, self.config.test_size, self.config.random_state)?;

        if let Some(missing) = (0..labels.n_classes()).find(|c| !split.y_train.contains(c)) {
            return Err(HealthError::Other(format!(
                "class '{}' does not appear in the training split",
                labels.inverse_transform(missing)?
            )));
        }

        tracing::info!(
            model = %self.config.model,
            n_samples = samples.len(),
            n_train = split.n_train(),
            n_classes = labels.n_classes(),
            "training stress classifier"
        );

        let mut scaler = StandardScaler::new();
        let x_train = scaler.fit_transform(&split.x_train)?;
        let x_test = scaler.transform(&split.x_test)?;

        let mut model = self.config.build_model();
        model.fit(&x_train, &split.y_train)?;

        let y_pred = model.predict(&x_test)?;
        let acc = accuracy(&y_pred, &split.y_test);
        let report = classification_report(&y_pred, &split.y_test, labels.classes());
        let confusion = confusion_matrix(&y_pred, &split.y_test);

        tracing::info!(accuracy = acc, n_test = split.n_test(), "training finished");

        let metrics = TrainingMetrics {
            model_kind: model.kind(),
            accuracy: acc,
            n_samples: samples.len(),
            n_train: split.n_train(),
            n_test: split.n_test(),
            classes: labels.classes().to_vec(),
            report,
            confusion,
        };
        self.bundle = Some(ModelBundle::new(model, scaler, labels)?);
        Ok(metrics)
    }

    fn fitted(&self) -> Result<&ModelBundle> {
        self.bundle.as_ref().ok_or_else(|| {
            tracing::warn!(
                model = %self.config.model,
                "stress classifier used before training or loading"
            );
            HealthError::ModelNotLoaded
        })
    }

    fn proba_for(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        let bundle = self.fitted()?;
        let scaled = bundle.scaler.transform_row(features)?;
        let x = Matrix::from_vec(1, N_FEATURES, scaled)?;
        let proba = bundle.model.predict_proba(&x)?;
        Ok(proba.row(0).to_vec())
    }

    fn label_for(&self, features: &FeatureVector) -> Result<String> {
        let proba = self.proba_for(features)?;
        let label = self.fitted()?.labels.inverse_transform(argmax(&proba))?;
        tracing::debug!(?features, label, "stress prediction");
        Ok(label.to_string())
    }

    /// Predicted label exactly as it appeared in training data.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ModelNotLoaded`] before training or loading.
    pub fn predict_label(&self, sample: &LifestyleSample) -> Result<String> {
        self.label_for(&encode(sample))
    }

    /// Predicted stress level.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ModelNotLoaded`] before training or loading,
    /// or [`HealthError::InvalidCategory`] if the model was trained on labels
    /// that are not stress levels.
    pub fn predict(&self, sample: &LifestyleSample) -> Result<Level> {
        let label = self.predict_label(sample)?;
        Level::parse_field("stress_level", &label)
    }

    /// Predicted stress level from raw categorical strings.
    ///
    /// # Errors
    ///
    /// As [`StressClassifier::predict`], plus [`HealthError::InvalidCategory`]
    /// for unknown activity or social levels and [`HealthError::OutOfRange`]
    /// for sleep or work hours outside `0..=24`.
    pub fn predict_raw(
        &self,
        sleep_hours: f32,
        physical_activity: &str,
        work_hours: f32,
        social_interaction: &str,
    ) -> Result<Level> {
        let features = encode_raw(sleep_hours, physical_activity, work_hours, social_interaction)?;
        let label = self.label_for(&features)?;
        Level::parse_field("stress_level", &label)
    }

    /// Probability of each class label.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ModelNotLoaded`] before training or loading.
    pub fn predict_proba(&self, sample: &LifestyleSample) -> Result<BTreeMap<String, f32>> {
        let proba = self.proba_for(&encode(sample))?;
        let classes = self.fitted()?.labels.classes();
        Ok(classes.iter().cloned().zip(proba).collect())
    }

    /// Writes the fitted bundle to `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ModelNotLoaded`] before training, or any I/O
    /// or encoding error.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<Fingerprint> {
        self.fitted()?.save(dir)
    }

    /// Loads a fitted bundle from `dir`.
    ///
    /// The model kind recorded in the bundle overrides `config.model`.
    ///
    /// # Errors
    ///
    /// As [`ModelBundle::load`].
    pub fn load(dir: impl AsRef<Path>, config: TrainingConfig) -> Result<Self> {
        Self::from_bundle(ModelBundle::load(dir)?, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(sleep: f32, activity: Level, work: f32, social: Level) -> LifestyleSample {
        LifestyleSample::new(sleep, 24.0, activity, work, social).expect("valid sample")
    }

    /// Three well separated lifestyle clusters.
    fn training_set() -> Vec<LabeledSample> {
        let mut out = Vec::new();
        for i in 0..20 {
            let d = (i % 5) as f32 * 0.2;
            out.push(LabeledSample::with_level(
                sample(4.0 + d, Level::Low, 12.0 - d, Level::Low),
                Level::High,
            ));
            out.push(LabeledSample::with_level(
                sample(6.0 + d, Level::Medium, 9.0 - d, Level::Medium),
                Level::Medium,
            ));
            out.push(LabeledSample::with_level(
                sample(8.0 + d, Level::High, 6.0 - d, Level::High),
                Level::Low,
            ));
        }
        out
    }

    #[test]
    fn test_untrained_reports_not_loaded() {
        let clf = StressClassifier::default();
        let s = sample(7.0, Level::Medium, 8.0, Level::Medium);
        assert!(!clf.is_trained());
        assert!(clf.classes().is_empty());
        assert!(matches!(clf.predict(&s), Err(HealthError::ModelNotLoaded)));
        assert!(matches!(clf.predict_proba(&s), Err(HealthError::ModelNotLoaded)));
        assert!(matches!(
            clf.predict_raw(7.0, "medium", 8.0, "medium"),
            Err(HealthError::ModelNotLoaded)
        ));
        assert!(matches!(
            clf.save(std::env::temp_dir()),
            Err(HealthError::ModelNotLoaded)
        ));
    }

    #[test]
    fn test_train_and_predict_logistic() {
        let mut clf = StressClassifier::default();
        let metrics = clf.train(&training_set()).expect("train");

        assert_eq!(metrics.model_kind, ModelKind::Logistic);
        assert_eq!(metrics.n_samples, 60);
        assert_eq!(metrics.n_train, 48);
        assert_eq!(metrics.n_test, 12);
        assert_eq!(metrics.classes, vec!["high", "low", "medium"]);
        assert!(metrics.accuracy > 0.9, "accuracy {}", metrics.accuracy);

        let tired = sample(4.2, Level::Low, 11.5, Level::Low);
        assert_eq!(clf.predict(&tired).expect("trained"), Level::High);
        assert_eq!(clf.predict_label(&tired).expect("trained"), "high");
        assert_eq!(
            clf.predict_raw(8.5, "HIGH", 5.5, " high ").expect("trained"),
            Level::Low
        );
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let mut clf = StressClassifier::new(TrainingConfig::for_model(ModelKind::DecisionTree));
        clf.train(&training_set()).expect("train");
        let proba = clf
            .predict_proba(&sample(6.3, Level::Medium, 8.8, Level::Medium))
            .expect("proba");
        assert_eq!(proba.len(), 3);
        let total: f32 = proba.values().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(proba["medium"] > 0.5);
    }

    #[test]
    fn test_predict_raw_rejects_bad_category() {
        let mut clf = StressClassifier::default();
        clf.train(&training_set()).expect("train");
        assert!(matches!(
            clf.predict_raw(7.0, "sometimes", 8.0, "low"),
            Err(HealthError::InvalidCategory { .. })
        ));
    }

    #[test]
    fn test_predict_raw_rejects_out_of_range_hours() {
        for kind in ModelKind::ALL {
            let mut clf = StressClassifier::new(TrainingConfig::for_model(kind));
            clf.train(&training_set()).expect("train");
            assert!(
                matches!(
                    clf.predict_raw(f32::NAN, "high", 6.0, "high"),
                    Err(HealthError::OutOfRange { .. })
                ),
                "{kind}: NaN sleep accepted"
            );
            assert!(
                matches!(
                    clf.predict_raw(-500.0, "high", 6.0, "high"),
                    Err(HealthError::OutOfRange { .. })
                ),
                "{kind}: negative sleep accepted"
            );
            assert!(
                matches!(
                    clf.predict_raw(7.0, "high", 99.0, "high"),
                    Err(HealthError::OutOfRange { .. })
                ),
                "{kind}: 99 work hours accepted"
            );
        }
    }

    #[test]
    fn test_train_requires_two_labels() {
        let samples: Vec<_> = (0..10)
            .map(|_| LabeledSample::with_level(sample(7.0, Level::Low, 8.0, Level::Low), Level::Low))
            .collect();
        let mut clf = StressClassifier::default();
        assert!(matches!(
            clf.train(&samples),
            Err(HealthError::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn test_train_requires_non_empty_split() {
        let samples = vec![
            LabeledSample::with_level(sample(4.0, Level::Low, 12.0, Level::Low), Level::High),
            LabeledSample::with_level(sample(8.0, Level::High, 6.0, Level::High), Level::Low),
        ];
        let mut clf = StressClassifier::default();
        assert!(clf.train(&samples).is_err());
        assert!(!clf.is_trained());
    }

    #[test]
    fn test_labels_come_from_data() {
        let samples: Vec<_> = training_set()
            .into_iter()
            .map(|s| {
                let label = if s.label == "high" { "stressed" } else { "calm" };
                LabeledSample::new(s.sample, label)
            })
            .collect();
        let mut clf = StressClassifier::default();
        clf.train(&samples).expect("train");
        assert_eq!(clf.classes(), ["calm", "stressed"]);

        let s = sample(4.1, Level::Low, 11.8, Level::Low);
        assert_eq!(clf.predict_label(&s).expect("trained"), "stressed");
        assert!(matches!(
            clf.predict(&s),
            Err(HealthError::InvalidCategory { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut clf = StressClassifier::new(TrainingConfig::for_model(ModelKind::DecisionTree));
        clf.train(&training_set()).expect("train");
        clf.save(dir.path()).expect("save");

        let loaded = StressClassifier::load(dir.path(), TrainingConfig::default()).expect("load");
        assert_eq!(loaded.model_kind(), ModelKind::DecisionTree);
        let s = sample(6.1, Level::Medium, 9.2, Level::Medium);
        assert_eq!(
            loaded.predict_proba(&s).expect("proba"),
            clf.predict_proba(&s).expect("proba")
        );
    }
}

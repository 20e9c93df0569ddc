//! Bag-of-words stress classifier for free text.
//!
//! [`CountVectorizer`] turns cleaned, stop-word-free text into token counts
//! over a vocabulary learned from training documents. [`TextStressClassifier`]
//! fits a [`SoftmaxRegression`] on those counts.
//!
//! # Example
//!
//! ```
//! use stress2health::text::TextStressClassifier;
//!
//! let mut texts = Vec::new();
//! let mut labels = Vec::new();
//! for i in 0..10 {
//!     texts.push(format!("deadline pressure again, day {i}, feeling anxious"));
//!     labels.push("high");
//!     texts.push(format!("slow peaceful morning walk, day {i}, relaxed"));
//!     labels.push("low");
//! }
//!
//! let mut clf = TextStressClassifier::new();
//! clf.train(&texts, &labels, 0.2, 42).expect("train");
//! assert_eq!(clf.predict("so anxious about this deadline").expect("trained"), "high");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tokenize;
use crate::classification::SoftmaxRegression;
use crate::error::{HealthError, Result};
use crate::metrics::accuracy;
use crate::model_selection::train_test_split;
use crate::preprocessing::LabelEncoder;
use crate::primitives::{argmax, Matrix};
use crate::traits::Classifier;

/// Token-count encoder with a sorted vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizer {
    vocabulary: BTreeMap<String, usize>,
}

impl CountVectorizer {
    /// Creates an unfitted vectorizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns the vocabulary of `docs`.
    ///
    /// # Errors
    ///
    /// Returns an error if no token survives cleaning.
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<()> {
        let mut terms: Vec<String> = docs.iter().flat_map(|d| tokenize(d.as_ref())).collect();
        terms.sort_unstable();
        terms.dedup();
        if terms.is_empty() {
            return Err("Cannot fit CountVectorizer: no tokens after cleaning".into());
        }
        self.vocabulary = terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect();
        Ok(())
    }

    /// Counts vocabulary tokens per document. Unknown tokens are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectorizer is not fitted.
    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> Result<Matrix<f32>> {
        if self.vocabulary.is_empty() {
            return Err("CountVectorizer not fitted".into());
        }
        let mut counts = Matrix::zeros(docs.len(), self.vocabulary.len());
        for (row, doc) in docs.iter().enumerate() {
            for token in tokenize(doc.as_ref()) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    counts.set(row, col, counts.get(row, col) + 1.0);
                }
            }
        }
        Ok(counts)
    }

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// As [`CountVectorizer::fit`].
    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<Matrix<f32>> {
        self.fit(docs)?;
        self.transform(docs)
    }

    /// Vocabulary size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether the vocabulary is empty (unfitted).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Vocabulary terms in column order.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }
}

/// Outcome of [`TextStressClassifier::train`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextTrainingMetrics {
    /// Accuracy on the held-out split
    pub accuracy: f32,
    /// Training split size
    pub n_train: usize,
    /// Held-out split size
    pub n_test: usize,
    /// Learned vocabulary size
    pub vocabulary_size: usize,
    /// Class labels in index order
    pub classes: Vec<String>,
}

/// Softmax regression over word counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextStressClassifier {
    vectorizer: CountVectorizer,
    model: SoftmaxRegression,
    labels: LabelEncoder,
}

impl TextStressClassifier {
    /// Creates an untrained classifier with default regression settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `model` (its hyper-parameters) for the next [`train`](Self::train).
    #[must_use]
    pub fn with_model(mut self, model: SoftmaxRegression) -> Self {
        self.model = model;
        self
    }

    /// Whether a model has been trained.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.model.n_classes().is_some()
    }

    /// Class labels in index order, empty before training.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        self.labels.classes()
    }

    /// The fitted vocabulary.
    #[must_use]
    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    /// Learns the vocabulary from every text, then fits on a seeded split
    /// and scores the held-out part. Labels are trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Fails if `texts` and `labels` differ in length, fewer than two
    /// distinct labels are present, no token survives cleaning, the split
    /// leaves a side empty or the training split is missing a class.
    pub fn train<S: AsRef<str>, L: AsRef<str>>(
        &mut self,
        texts: &[S],
        labels: &[L],
        test_size: f32,
        random_state: u64,
    ) -> Result<TextTrainingMetrics> {
        if texts.len() != labels.len() {
            return Err(HealthError::dimension_mismatch("n_labels", texts.len(), labels.len()));
        }
        let normalized: Vec<String> = labels
            .iter()
            .map(|l| l.as_ref().trim().to_ascii_lowercase())
            .collect();
        let mut encoder = LabelEncoder::new();
        let y = encoder.fit_transform(&normalized)?;
        if encoder.n_classes() < 2 {
            return Err(HealthError::InvalidHyperparameter {
                param: "label".to_string(),
                value: encoder.classes().join(", "),
                constraint: "at least two distinct labels".to_string(),
            });
        }

        let mut vectorizer = CountVectorizer::new();
        let x = vectorizer.fit_transform(texts)?;
        let split = train_test_split(&x, &y, test_size, random_state)?;
        if let Some(missing) = (0..encoder.n_classes()).find(|c| !split.y_train.contains(c)) {
            return Err(HealthError::Other(format!(
                "class '{}' does not appear in the training split",
                encoder.inverse_transform(missing)?
            )));
        }

        let mut model = self.model.clone();
        model.fit(&split.x_train, &split.y_train)?;
        let acc = accuracy(&model.predict(&split.x_test)?, &split.y_test);
        tracing::info!(
            accuracy = acc,
            vocabulary = vectorizer.len(),
            n_train = split.n_train(),
            "text stress classifier trained"
        );

        let metrics = TextTrainingMetrics {
            accuracy: acc,
            n_train: split.n_train(),
            n_test: split.n_test(),
            vocabulary_size: vectorizer.len(),
            classes: encoder.classes().to_vec(),
        };
        *self = Self {
            vectorizer,
            model,
            labels: encoder,
        };
        Ok(metrics)
    }

    fn proba_row(&self, text: &str) -> Result<Vec<f32>> {
        if !self.is_trained() {
            return Err(HealthError::ModelNotLoaded);
        }
        let x = self.vectorizer.transform(&[text])?;
        Ok(self.model.predict_proba(&x)?.row(0).to_vec())
    }

    /// Most likely label for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ModelNotLoaded`] before training.
    pub fn predict(&self, text: &str) -> Result<String> {
        let proba = self.proba_row(text)?;
        Ok(self.labels.inverse_transform(argmax(&proba))?.to_string())
    }

    /// Probability of each label for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ModelNotLoaded`] before training.
    pub fn predict_proba(&self, text: &str) -> Result<BTreeMap<String, f32>> {
        let proba = self.proba_row(text)?;
        Ok(self.labels.classes().iter().cloned().zip(proba).collect())
    }
}

//! Label encoding for class targets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{HealthError, Result};

/// Ordered bijection between string labels and class indices.
///
/// Classes are sorted lexicographically, so the mapping depends only on the
/// set of labels seen and never on their order in the data. For the stress
/// labels this gives `high = 0`, `low = 1`, `medium = 2`.
///
/// # Example
///
/// ```
/// use stress2health::preprocessing::LabelEncoder;
///
/// let mut enc = LabelEncoder::new();
/// let y = enc.fit_transform(&["medium", "low", "high", "low"]).expect("labels");
/// assert_eq!(y, vec![2, 1, 0, 1]);
/// assert_eq!(enc.inverse_transform(0).expect("known index"), "high");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Creates an unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an encoder from an explicit class list, sorting and
    /// deduplicating it.
    #[must_use]
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> Self {
        let set: BTreeSet<String> = classes.iter().map(|c| c.as_ref().to_string()).collect();
        Self {
            classes: set.into_iter().collect(),
        }
    }

    /// Learns the sorted set of distinct labels.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input.
    pub fn fit<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<()> {
        if labels.is_empty() {
            return Err("Cannot fit LabelEncoder with zero labels".into());
        }
        *self = Self::from_classes(labels);
        Ok(())
    }

    /// Maps labels to class indices.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder is unfitted or a label was not seen
    /// during fit.
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.index_of(l.as_ref())).collect()
    }

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Same as [`LabelEncoder::fit`].
    pub fn fit_transform<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<Vec<usize>> {
        self.fit(labels)?;
        self.transform(labels)
    }

    /// Class index of a single label.
    ///
    /// # Errors
    ///
    /// Returns an error for a label not seen during fit.
    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| HealthError::Other(format!("Unknown label '{label}'")))
    }

    /// Label for a class index.
    ///
    /// # Errors
    ///
    /// Returns a dimension error for an index outside `0..n_classes`.
    pub fn inverse_transform(&self, index: usize) -> Result<&str> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| HealthError::dimension_mismatch("class index <", self.classes.len(), index))
    }

    /// Sorted class labels.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Returns true once at least one class is known.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }
}

//! Classification metrics for evaluating classifier performance.
//!
//! All functions take class indices and treat `0..n_classes` as the label
//! space, where `n_classes` is one more than the largest index seen in either
//! input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::primitives::Matrix;

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// Returns 0.0 for empty input.
///
/// # Panics
///
/// Panics if the slices have different lengths.
///
/// # Examples
///
/// ```
/// use stress2health::metrics::accuracy;
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let acc = accuracy(&y_pred, &y_true);
/// assert!((acc - 0.333333).abs() < 0.001);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    if y_true.is_empty() {
        return 0.0;
    }

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f32 / y_true.len() as f32
}

fn n_classes_of(y_pred: &[usize], y_true: &[usize]) -> usize {
    y_true
        .iter()
        .chain(y_pred.iter())
        .max()
        .map_or(0, |&m| m + 1)
}

/// Compute confusion matrix.
///
/// Element `[i, j]` counts samples with true label `i` predicted as `j`.
///
/// # Panics
///
/// Panics if the slices have different lengths.
///
/// # Examples
///
/// ```
/// use stress2health::metrics::confusion_matrix;
///
/// let y_true = vec![0, 0, 1, 1, 2, 2];
/// let y_pred = vec![0, 1, 1, 1, 2, 0];
/// let cm = confusion_matrix(&y_pred, &y_true);
/// assert_eq!(cm.shape(), (3, 3));
/// assert_eq!(cm.get(0, 1), 1);
/// ```
#[must_use]
pub fn confusion_matrix(y_pred: &[usize], y_true: &[usize]) -> Matrix<usize> {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    let n_classes = n_classes_of(y_pred, y_true);
    counts_matrix(y_pred, y_true, n_classes)
}

fn counts_matrix(y_pred: &[usize], y_true: &[usize], n_classes: usize) -> Matrix<usize> {
    let mut cm = Matrix::filled(n_classes, n_classes, 0usize);
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        cm.set(t, p, cm.get(t, p) + 1);
    }
    cm
}

/// Compute TP, FP, FN and support for each class.
fn compute_tp_fp_fn(
    y_pred: &[usize],
    y_true: &[usize],
    n_classes: usize,
) -> (Vec<usize>, Vec<usize>, Vec<usize>, Vec<usize>) {
    let mut tp = vec![0usize; n_classes];
    let mut fp = vec![0usize; n_classes];
    let mut fn_counts = vec![0usize; n_classes];
    let mut support = vec![0usize; n_classes];

    for (&true_label, &pred_label) in y_true.iter().zip(y_pred.iter()) {
        support[true_label] += 1;

        if true_label == pred_label {
            tp[true_label] += 1;
        } else {
            fp[pred_label] += 1;
            fn_counts[true_label] += 1;
        }
    }

    (tp, fp, fn_counts, support)
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

fn f1_from_prec_rec(precision: f32, recall: f32) -> f32 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Class label
    pub label: String,
    /// TP / (TP + FP)
    pub precision: f32,
    /// TP / (TP + FN)
    pub recall: f32,
    /// Harmonic mean of precision and recall
    pub f1: f32,
    /// Number of true instances
    pub support: usize,
}

/// Per-class metrics plus overall accuracy, with a text rendering in the
/// familiar tabular layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// One entry per class, in class-index order
    pub classes: Vec<ClassMetrics>,
    /// Overall accuracy
    pub accuracy: f32,
    /// Unweighted mean F1 over classes
    pub macro_f1: f32,
    /// Total number of samples
    pub total_support: usize,
}

/// Builds a [`ClassificationReport`] for the given class names.
///
/// `labels[i]` names class index `i`; classes absent from both inputs still
/// get a row with zero support.
///
/// # Panics
///
/// Panics if the slices have different lengths or an index is out of range
/// for `labels`.
///
/// # Examples
///
/// ```
/// use stress2health::metrics::classification_report;
///
/// let labels = vec!["high".to_string(), "low".to_string()];
/// let report = classification_report(&[0, 1, 1], &[0, 1, 0], &labels);
/// assert_eq!(report.classes.len(), 2);
/// assert_eq!(report.classes[0].support, 2);
/// assert!((report.classes[0].precision - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn classification_report(
    y_pred: &[usize],
    y_true: &[usize],
    labels: &[String],
) -> ClassificationReport {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    let n_classes = labels.len();
    let (tp, fp, fn_counts, support) = compute_tp_fp_fn(y_pred, y_true, n_classes);

    let classes: Vec<ClassMetrics> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let precision = ratio(tp[i], tp[i] + fp[i]);
            let recall = ratio(tp[i], tp[i] + fn_counts[i]);
            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1: f1_from_prec_rec(precision, recall),
                support: support[i],
            }
        })
        .collect();

    let macro_f1 = if classes.is_empty() {
        0.0
    } else {
        classes.iter().map(|c| c.f1).sum::<f32>() / classes.len() as f32
    };

    ClassificationReport {
        classes,
        accuracy: accuracy(y_pred, y_true),
        macro_f1,
        total_support: y_true.len(),
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.total_support
        )?;
        write!(
            f,
            "{:>12} {:>10} {:>10} {:>10.2} {:>10}",
            "macro f1", "", "", self.macro_f1, self.total_support
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_accuracy_perfect() {
        assert!((accuracy(&[0, 1, 2], &[0, 1, 2]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_accuracy_empty_is_zero() {
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_accuracy_length_mismatch_panics() {
        let _ = accuracy(&[0, 1], &[0]);
    }

    #[test]
    fn test_confusion_matrix_counts() {
        let y_true = vec![0, 0, 1, 1, 2, 2];
        let y_pred = vec![0, 1, 1, 1, 2, 0];
        let cm = confusion_matrix(&y_pred, &y_true);
        assert_eq!(cm.row(0), &[1, 1, 0]);
        assert_eq!(cm.row(1), &[0, 2, 0]);
        assert_eq!(cm.row(2), &[1, 0, 1]);
        let total: usize = cm.as_slice().iter().sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_report_per_class_values() {
        // class 0: tp=1 fp=1 fn=1; class 1: tp=2 fp=0 fn=0; class 2: tp=1 fp=1 fn=1
        let y_true = vec![0, 0, 1, 1, 2, 2];
        let y_pred = vec![0, 2, 1, 1, 2, 0];
        let report = classification_report(&y_pred, &y_true, &labels(&["high", "low", "medium"]));
        assert!((report.classes[0].precision - 0.5).abs() < 1e-6);
        assert!((report.classes[0].recall - 0.5).abs() < 1e-6);
        assert!((report.classes[1].f1 - 1.0).abs() < 1e-6);
        assert_eq!(report.classes[2].support, 2);
        assert!((report.accuracy - 4.0 / 6.0).abs() < 1e-6);
        assert!((report.macro_f1 - 2.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_report_absent_class_has_zero_support() {
        let report = classification_report(&[0, 0], &[0, 0], &labels(&["a", "b"]));
        assert_eq!(report.classes[1].support, 0);
        assert_eq!(report.classes[1].f1, 0.0);
    }

    #[test]
    fn test_report_display_lists_labels() {
        let report = classification_report(&[0, 1], &[0, 1], &labels(&["high", "low"]));
        let text = report.to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("high"));
        assert!(text.contains("accuracy"));
    }
}

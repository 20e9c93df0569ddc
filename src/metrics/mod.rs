//! Evaluation metrics for the stress classifier.
//!
//! Accuracy is what training reports; the per-class report and confusion
//! matrix are kept alongside so a trained bundle can be inspected.

pub mod classification;

pub use classification::{accuracy, classification_report, confusion_matrix, ClassMetrics, ClassificationReport};

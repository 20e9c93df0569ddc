//! Helper functions for tree building.
//!
//! Trees are grown over index lists into the training matrix so no rows are
//! copied while recursing.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::index::sample;

use crate::primitives::Matrix;

/// Values closer than this are treated as equal when proposing thresholds.
const VALUE_EPS: f32 = 1e-10;

/// Per-class counts for the labels at `indices`.
pub(super) fn class_counts(y: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in indices {
        counts[y[i]] += 1;
    }
    counts
}

/// Counts normalised to a probability distribution.
pub(super) fn distribution(counts: &[usize]) -> Vec<f32> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f32 / total as f32).collect()
}

/// Gini = 1 - Σ(p_i²)
pub(super) fn gini_from_counts(counts: &[usize]) -> f32 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let n = total as f32;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f32 / n;
            p * p
        })
        .sum::<f32>()
}

/// Gini impurity of a label set.
#[must_use]
pub fn gini_impurity(labels: &[usize]) -> f32 {
    let n_classes = labels.iter().max().map_or(0, |&m| m + 1);
    let all: Vec<usize> = (0..labels.len()).collect();
    gini_from_counts(&class_counts(labels, &all, n_classes))
}

/// Best split found for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Split {
    pub feature_idx: usize,
    pub threshold: f32,
    pub gain: f32,
}

/// Finds the split with the largest Gini gain over `features`.
///
/// Thresholds are midpoints between consecutive distinct values. Earlier
/// features and lower thresholds win ties. Returns `None` when no split
/// reduces impurity.
pub(super) fn find_best_split(
    x: &Matrix<f32>,
    y: &[usize],
    indices: &[usize],
    features: &[usize],
    n_classes: usize,
) -> Option<Split> {
    if indices.len() < 2 {
        return None;
    }

    let parent_counts = class_counts(y, indices, n_classes);
    let parent_gini = gini_from_counts(&parent_counts);
    let n = indices.len() as f32;
    let mut best: Option<Split> = None;

    for &feature_idx in features {
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| x.get(a, feature_idx).total_cmp(&x.get(b, feature_idx)));

        // Sweep left to right, moving one sample at a time into the left side
        let mut left = vec![0usize; n_classes];
        let mut right = parent_counts.clone();
        for w in 0..order.len() - 1 {
            let label = y[order[w]];
            left[label] += 1;
            right[label] -= 1;

            let here = x.get(order[w], feature_idx);
            let next = x.get(order[w + 1], feature_idx);
            if next - here <= VALUE_EPS {
                continue;
            }

            let n_left = (w + 1) as f32;
            let weighted =
                (n_left / n) * gini_from_counts(&left) + ((n - n_left) / n) * gini_from_counts(&right);
            let gain = parent_gini - weighted;
            if gain > best.map_or(0.0, |s| s.gain) {
                best = Some(Split {
                    feature_idx,
                    threshold: (here + next) / 2.0,
                    gain,
                });
            }
        }
    }

    best
}

/// Partitions `indices` by `x[i][feature] <= threshold`.
pub(super) fn partition(
    x: &Matrix<f32>,
    indices: &[usize],
    feature_idx: usize,
    threshold: f32,
) -> (Vec<usize>, Vec<usize>) {
    indices
        .iter()
        .copied()
        .partition(|&i| x.get(i, feature_idx) <= threshold)
}

/// Chooses which features a node may split on.
///
/// `None` means every feature; `Some(k)` draws `k` distinct features.
pub(super) fn candidate_features(
    n_features: usize,
    max_features: Option<usize>,
    rng: &mut StdRng,
) -> Vec<usize> {
    match max_features {
        Some(k) if k < n_features => {
            let mut chosen = sample(rng, n_features, k).into_vec();
            chosen.sort_unstable();
            chosen
        }
        _ => (0..n_features).collect(),
    }
}

/// Creates a bootstrap sample (random sample with replacement).
pub(super) fn bootstrap_sample(n_samples: usize, rng: &mut StdRng) -> Vec<usize> {
    let dist = Uniform::from(0..n_samples);
    (0..n_samples).map(|_| dist.sample(rng)).collect()
}

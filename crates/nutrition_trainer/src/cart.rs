//! CART (Classification and Regression Tree) builder
//!
//! Implements exact-greedy regression tree construction with squared-error
//! reduction. Candidate thresholds are midpoints between consecutive distinct
//! feature values; ties keep the first candidate in (feature, threshold)
//! order so that identical inputs always grow identical trees.

use nutritrack_ml_core::{Node, RegressionTree};
use std::cmp::Ordering;

/// Growth limits for a single tree
#[derive(Clone, Debug, PartialEq)]
pub struct TreeConfig {
    /// `None` grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Build a regression tree over a subset (possibly with repeats) of rows
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [Vec<f64>],
    targets: &'a [f64],
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    pub fn new(features: &'a [Vec<f64>], targets: &'a [f64], config: TreeConfig) -> Self {
        debug_assert_eq!(features.len(), targets.len());

        let feature_count = features.first().map(Vec::len).unwrap_or(0);

        Self {
            config,
            features,
            targets,
            feature_count,
        }
    }

    /// Grow a tree from the rows listed in `sample`
    pub fn build(&self, sample: &[usize]) -> RegressionTree {
        let mut nodes = Vec::new();
        self.build_node(sample, 0, &mut nodes);
        RegressionTree::new(nodes)
    }

    /// Recursively build tree nodes, returning the index of the created node
    fn build_node(&self, indices: &[usize], depth: usize, nodes: &mut Vec<Node>) -> i32 {
        let current_idx = nodes.len();
        let leaf_value = self.mean_target(indices);

        let depth_exhausted = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_exhausted
            || indices.len() < self.config.min_samples_split
            || indices.len() < 2 * self.config.min_samples_leaf
            || self.is_pure(indices)
        {
            nodes.push(Node::leaf(leaf_value));
            return current_idx as i32;
        }

        let Some(split) = self.find_best_split(indices) else {
            nodes.push(Node::leaf(leaf_value));
            return current_idx as i32;
        };

        let (left_indices, right_indices) =
            self.split_samples(indices, split.feature_idx, split.threshold);

        // Reserve space for current node
        nodes.push(Node::internal(split.feature_idx as i32, split.threshold));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes);

        nodes[current_idx].left = left_idx;
        nodes[current_idx].right = right_idx;

        current_idx as i32
    }

    /// Find best split using the exact-greedy algorithm.
    ///
    /// Gain is `S_l²/n_l + S_r²/n_r - S²/n`, proportional to the reduction
    /// in squared error.
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let n = indices.len();
        let total: f64 = indices.iter().map(|&i| self.targets[i]).sum();
        let parent_score = total * total / n as f64;
        let min_leaf = self.config.min_samples_leaf.max(1);

        let mut best: Option<SplitCandidate> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature_idx in 0..self.feature_count {
            column.clear();
            column.extend(
                indices
                    .iter()
                    .map(|&i| (self.features[i][feature_idx], self.targets[i])),
            );

            // Constant columns (mostly all-zero TF-IDF terms) cannot split
            let first = column[0].0;
            if column.iter().all(|&(v, _)| v == first) {
                continue;
            }

            column.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut left_sum = 0.0;
            for i in 0..n - 1 {
                left_sum += column[i].1;
                let (value, next_value) = (column[i].0, column[i + 1].0);
                if value == next_value {
                    continue;
                }

                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / n_left as f64
                    + right_sum * right_sum / n_right as f64
                    - parent_score;

                let is_better = match &best {
                    None => true,
                    Some(current) => gain > current.gain,
                };
                if is_better {
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold: midpoint(value, next_value),
                        gain,
                    });
                }
            }
        }

        best
    }

    fn split_samples(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: f64,
    ) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .copied()
            .partition(|&idx| self.features[idx][feature_idx] <= threshold)
    }

    fn mean_target(&self, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        indices.iter().map(|&i| self.targets[i]).sum::<f64>() / indices.len() as f64
    }

    fn is_pure(&self, indices: &[usize]) -> bool {
        match indices.first() {
            Some(&first) => indices
                .iter()
                .all(|&i| self.targets[i] == self.targets[first]),
            None => true,
        }
    }
}

/// Midpoint that still separates `low` from `high` after rounding
fn midpoint(low: f64, high: f64) -> f64 {
    let mid = low + (high - low) / 2.0;
    if mid >= high {
        low
    } else {
        mid
    }
}

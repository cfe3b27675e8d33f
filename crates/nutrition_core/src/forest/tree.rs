//! Regression tree structures
//!
//! Trees are stored as flat node arrays with node 0 as the root.

use serde::{Deserialize, Serialize};

/// A regression tree node (internal or leaf)
///
/// Internal nodes route `x[feature_idx] <= threshold` to `left`, everything
/// else to `right`. Leaf nodes carry the mean target of their samples in
/// `leaf` and have `feature_idx == -1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub left: i32,
    pub right: i32,
    pub feature_idx: i32,
    pub threshold: f64,
    pub leaf: Option<f64>,
}

impl Node {
    /// Create a new internal (split) node; children are patched in later
    pub fn internal(feature_idx: i32, threshold: f64) -> Self {
        Self {
            left: -1,
            right: -1,
            feature_idx,
            threshold,
            leaf: None,
        }
    }

    /// Create a new leaf node
    pub fn leaf(value: f64) -> Self {
        Self {
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0.0,
            leaf: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf.is_some()
    }
}

/// A single regression tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RegressionTree {
    pub nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Maximum root-to-leaf depth (a single leaf has depth 0)
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(node) if !node.is_leaf() => {
                    1 + walk(nodes, node.left as usize).max(walk(nodes, node.right as usize))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    /// Traverse the tree for one feature vector
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;

        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0.0;
            };

            if let Some(value) = node.leaf {
                return value;
            }

            let feature = features.get(node.feature_idx as usize).copied().unwrap_or(0.0);
            idx = if feature <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }

    /// Validate structure: children in range and pointing forward
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        let len = self.nodes.len() as i32;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                continue;
            }

            let i = i as i32;
            if node.left <= i || node.left >= len || node.right <= i || node.right >= len {
                return Err(format!("node {} has invalid children", i));
            }

            if node.feature_idx < 0 || node.feature_idx as usize >= feature_count {
                return Err(format!(
                    "node {} splits on feature {} of {}",
                    i, node.feature_idx, feature_count
                ));
            }
        }

        Ok(())
    }
}

//! Weighted CART decision tree with probability leaves.
//!
//! Splits minimize weighted Gini impurity; leaves keep the weighted class
//! distribution rather than a single label so the forest can average
//! probabilities. Nodes live in a flat arena (index 0 = root) and
//! serialize with the model artifact.

use serde::{Deserialize, Serialize};

use toxscreen_core::{Error, Result};

/// A node in the fitted tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Normalized `[p_negative, p_positive]` of the training weight
        /// that reached this leaf.
        dist: [f64; 2],
    },
}

/// A fitted binary decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Fit on a subset of rows and features.
    ///
    /// * `data` - flat row-major `n_samples x n_features`
    /// * `labels` - 0/1 per row
    /// * `weights` - per-row training weight
    /// * `rows` - row indices to train on (bootstrap sample)
    /// * `features` - candidate feature indices for splits
    pub(crate) fn fit(
        data: &[f64],
        n_features: usize,
        labels: &[u8],
        weights: &[f64],
        rows: &[usize],
        features: &[usize],
        max_depth: usize,
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::model("empty sample set"));
        }
        let mut nodes = Vec::new();
        grow(
            data, n_features, labels, weights, rows, features, max_depth, 0, &mut nodes,
        );
        Ok(Self { nodes })
    }

    /// Class distribution `[p_negative, p_positive]` for one sample.
    pub fn predict_dist(&self, sample: &[f64]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { dist } => return *dist,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if sample[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Recursively grow the tree; returns the arena index of the new node.
#[allow(clippy::too_many_arguments)]
fn grow(
    data: &[f64],
    n_features: usize,
    labels: &[u8],
    weights: &[f64],
    rows: &[usize],
    features: &[usize],
    max_depth: usize,
    depth: usize,
    nodes: &mut Vec<TreeNode>,
) -> usize {
    let (w_neg, w_pos) = class_weights(labels, weights, rows);
    let leaf_dist = normalize(w_neg, w_pos);

    if depth >= max_depth || rows.len() < 2 || w_neg == 0.0 || w_pos == 0.0 {
        let idx = nodes.len();
        nodes.push(TreeNode::Leaf { dist: leaf_dist });
        return idx;
    }

    let Some((feature, threshold)) =
        best_split(data, n_features, labels, weights, rows, features)
    else {
        let idx = nodes.len();
        nodes.push(TreeNode::Leaf { dist: leaf_dist });
        return idx;
    };

    let (left_rows, right_rows) = partition(data, n_features, rows, feature, threshold);
    if left_rows.is_empty() || right_rows.is_empty() {
        let idx = nodes.len();
        nodes.push(TreeNode::Leaf { dist: leaf_dist });
        return idx;
    }

    let node_idx = nodes.len();
    nodes.push(TreeNode::Leaf { dist: leaf_dist }); // placeholder until children exist

    let left = grow(
        data, n_features, labels, weights, &left_rows, features, max_depth, depth + 1, nodes,
    );
    let right = grow(
        data, n_features, labels, weights, &right_rows, features, max_depth, depth + 1, nodes,
    );

    nodes[node_idx] = TreeNode::Split {
        feature,
        threshold,
        left,
        right,
    };
    node_idx
}

/// Best (feature, threshold) by weighted Gini gain, or `None` when no
/// split separates anything.
fn best_split(
    data: &[f64],
    n_features: usize,
    labels: &[u8],
    weights: &[f64],
    rows: &[usize],
    features: &[usize],
) -> Option<(usize, f64)> {
    let (w_neg, w_pos) = class_weights(labels, weights, rows);
    let total = w_neg + w_pos;
    let parent = gini(w_neg, w_pos);

    let mut best: Option<(usize, f64)> = None;
    let mut best_gain = 1e-12;

    for &feat in features {
        let mut values: Vec<f64> = rows.iter().map(|&r| data[r * n_features + feat]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();
        if values.len() < 2 {
            continue;
        }

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let mut left = (0.0, 0.0);
            let mut right = (0.0, 0.0);
            for &r in rows {
                let side = if data[r * n_features + feat] <= threshold {
                    &mut left
                } else {
                    &mut right
                };
                if labels[r] == 1 {
                    side.1 += weights[r];
                } else {
                    side.0 += weights[r];
                }
            }

            let wl = left.0 + left.1;
            let wr = right.0 + right.1;
            if wl == 0.0 || wr == 0.0 {
                continue;
            }

            let weighted =
                (wl * gini(left.0, left.1) + wr * gini(right.0, right.1)) / total;
            let gain = parent - weighted;
            if gain > best_gain {
                best_gain = gain;
                best = Some((feat, threshold));
            }
        }
    }

    best
}

fn class_weights(labels: &[u8], weights: &[f64], rows: &[usize]) -> (f64, f64) {
    let mut w = (0.0, 0.0);
    for &r in rows {
        if labels[r] == 1 {
            w.1 += weights[r];
        } else {
            w.0 += weights[r];
        }
    }
    w
}

fn gini(w_neg: f64, w_pos: f64) -> f64 {
    let total = w_neg + w_pos;
    if total == 0.0 {
        return 0.0;
    }
    let p = w_pos / total;
    let q = w_neg / total;
    1.0 - p * p - q * q
}

fn normalize(w_neg: f64, w_pos: f64) -> [f64; 2] {
    let total = w_neg + w_pos;
    if total == 0.0 {
        [0.5, 0.5]
    } else {
        [w_neg / total, w_pos / total]
    }
}

fn partition(
    data: &[f64],
    n_features: usize,
    rows: &[usize],
    feature: usize,
    threshold: f64,
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &r in rows {
        if data[r * n_features + feature] <= threshold {
            left.push(r);
        } else {
            right.push(r);
        }
    }
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit_all(
        data: &[f64],
        n_features: usize,
        labels: &[u8],
        max_depth: usize,
    ) -> DecisionTree {
        let rows: Vec<usize> = (0..labels.len()).collect();
        let features: Vec<usize> = (0..n_features).collect();
        let weights = vec![1.0; labels.len()];
        DecisionTree::fit(data, n_features, labels, &weights, &rows, &features, max_depth)
            .unwrap()
    }

    #[test]
    fn separable_data_gets_confident_leaves() {
        let data = vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let labels = vec![0, 0, 0, 1, 1, 1];
        let tree = fit_all(&data, 1, &labels, 8);

        assert!(tree.predict_dist(&[1.0])[1] < 0.01);
        assert!(tree.predict_dist(&[11.0])[1] > 0.99);
    }

    #[test]
    fn distributions_sum_to_one() {
        let data = vec![0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0];
        let labels = vec![0, 1, 1, 0];
        let tree = fit_all(&data, 2, &labels, 4);
        let d = tree.predict_dist(&[0.5, 0.5]);
        assert!((d[0] + d[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pure_input_is_single_leaf() {
        let data = vec![0.0, 5.0, 9.0];
        let labels = vec![1, 1, 1];
        let tree = fit_all(&data, 1, &labels, 8);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_dist(&[100.0]), [0.0, 1.0]);
    }

    #[test]
    fn max_depth_zero_is_prior() {
        let data = vec![0.0, 1.0, 2.0, 3.0];
        let labels = vec![0, 0, 0, 1];
        let tree = fit_all(&data, 1, &labels, 0);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_dist(&[0.0]), [0.75, 0.25]);
    }

    #[test]
    fn sample_weights_shift_the_leaf() {
        // One positive with weight 3 balances three negatives
        let data = vec![0.0, 0.0, 0.0, 0.0];
        let labels = vec![0, 0, 0, 1];
        let weights = vec![1.0, 1.0, 1.0, 3.0];
        let rows = vec![0, 1, 2, 3];
        let tree =
            DecisionTree::fit(&data, 1, &labels, &weights, &rows, &[0], 4).unwrap();
        assert_eq!(tree.predict_dist(&[0.0]), [0.5, 0.5]);
    }

    #[test]
    fn empty_rows_error() {
        let err = DecisionTree::fit(&[1.0], 1, &[0], &[1.0], &[], &[0], 4);
        assert!(err.is_err());
    }

    #[test]
    fn serde_round_trip() {
        let data = vec![0.0, 10.0];
        let labels = vec![0, 1];
        let tree = fit_all(&data, 1, &labels, 4);
        let json = serde_json::to_string(&tree).unwrap();
        let back: DecisionTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back.predict_dist(&[0.0]), tree.predict_dist(&[0.0]));
    }
}

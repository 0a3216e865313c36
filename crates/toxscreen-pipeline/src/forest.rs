//! Random forest with probability output.
//!
//! Bootstrap-bagged [`DecisionTree`]s with per-tree feature subsampling.
//! `predict_proba` averages the leaf class distributions across trees,
//! which gives a smoother probability surface than vote counting.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use toxscreen_core::{Error, Result};

use crate::classifier::ProbClassifier;
use crate::tree::DecisionTree;

/// Forest hyper-parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestConfig {
    /// Ensemble size.
    #[serde(default = "default_trees")]
    pub n_trees: usize,

    /// Depth cap per tree.
    #[serde(default = "default_depth")]
    pub max_depth: usize,

    /// Features considered per tree; `None` means `sqrt(n_features)`.
    #[serde(default)]
    pub max_features: Option<usize>,

    /// Seed for bootstrap and feature sampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_trees: default_trees(),
            max_depth: default_depth(),
            max_features: None,
            seed: default_seed(),
        }
    }
}

fn default_trees() -> usize {
    100
}

fn default_depth() -> usize {
    16
}

fn default_seed() -> u64 {
    42
}

/// A fitted (or not yet fitted) random forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: RandomForestConfig,
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn new(config: RandomForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Feature width the forest was trained on (0 before fitting).
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn config(&self) -> &RandomForestConfig {
        &self.config
    }
}

impl ProbClassifier for RandomForest {
    fn fit(
        &mut self,
        data: &[f64],
        n_features: usize,
        labels: &[u8],
        weights: &[f64],
    ) -> Result<()> {
        if data.is_empty() {
            return Err(Error::model("empty training data"));
        }
        if n_features == 0 {
            return Err(Error::model("n_features must be > 0"));
        }
        if data.len() % n_features != 0 {
            return Err(Error::model(format!(
                "data length {} not divisible by n_features {}",
                data.len(),
                n_features
            )));
        }
        let n_samples = data.len() / n_features;
        if labels.len() != n_samples || weights.len() != n_samples {
            return Err(Error::model(format!(
                "labels ({}) and weights ({}) must both match n_samples ({})",
                labels.len(),
                weights.len(),
                n_samples
            )));
        }
        if self.config.n_trees == 0 {
            return Err(Error::model("n_trees must be > 0"));
        }

        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| ((n_features as f64).sqrt() as usize).max(1))
            .min(n_features);

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut trees = Vec::with_capacity(self.config.n_trees);

        for _ in 0..self.config.n_trees {
            let rows: Vec<usize> = (0..n_samples)
                .map(|_| rng.gen_range(0..n_samples))
                .collect();
            let features = feature_subset(&mut rng, n_features, max_features);
            trees.push(DecisionTree::fit(
                data,
                n_features,
                labels,
                weights,
                &rows,
                &features,
                self.config.max_depth,
            )?);
        }

        debug!(
            trees = trees.len(),
            n_samples, n_features, "random forest fitted"
        );
        self.trees = trees;
        self.n_features = n_features;
        Ok(())
    }

    fn predict_proba(&self, sample: &[f64]) -> Result<[f64; 2]> {
        if self.trees.is_empty() {
            return Err(Error::model("predict_proba called before fit"));
        }
        if sample.len() != self.n_features {
            return Err(Error::model(format!(
                "sample has {} features, model expects {}",
                sample.len(),
                self.n_features
            )));
        }
        let mut acc = [0.0, 0.0];
        for tree in &self.trees {
            let d = tree.predict_dist(sample);
            acc[0] += d[0];
            acc[1] += d[1];
        }
        let n = self.trees.len() as f64;
        Ok([acc[0] / n, acc[1] / n])
    }
}

/// Draw `count` distinct feature indices with a partial Fisher-Yates pass.
fn feature_subset(rng: &mut StdRng, n_features: usize, count: usize) -> Vec<usize> {
    if count >= n_features {
        return (0..n_features).collect();
    }
    let mut pool: Vec<usize> = (0..n_features).collect();
    for i in 0..count {
        let j = rng.gen_range(i..n_features);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cluster_data() -> (Vec<f64>, Vec<u8>) {
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for i in 0..12 {
            let jitter = i as f64 * 0.05;
            data.extend_from_slice(&[jitter, 1.0 - jitter]);
            labels.push(0);
        }
        for i in 0..12 {
            let jitter = i as f64 * 0.05;
            data.extend_from_slice(&[8.0 + jitter, 9.0 - jitter]);
            labels.push(1);
        }
        (data, labels)
    }

    fn fit_forest(config: RandomForestConfig) -> RandomForest {
        let (data, labels) = two_cluster_data();
        let weights = vec![1.0; labels.len()];
        let mut forest = RandomForest::new(config);
        forest.fit(&data, 2, &labels, &weights).unwrap();
        forest
    }

    #[test]
    fn probabilities_separate_the_clusters() {
        let forest = fit_forest(RandomForestConfig {
            n_trees: 25,
            ..Default::default()
        });
        assert!(forest.predict_proba(&[0.2, 0.8]).unwrap()[1] < 0.2);
        assert!(forest.predict_proba(&[8.2, 8.8]).unwrap()[1] > 0.8);
    }

    #[test]
    fn proba_sums_to_one() {
        let forest = fit_forest(RandomForestConfig {
            n_trees: 10,
            ..Default::default()
        });
        let p = forest.predict_proba(&[4.0, 5.0]).unwrap();
        assert!((p[0] + p[1] - 1.0).abs() < 1e-9);
        assert!(p[1] >= 0.0 && p[1] <= 1.0);
    }

    #[test]
    fn same_seed_same_model() {
        let a = fit_forest(RandomForestConfig { n_trees: 8, seed: 7, ..Default::default() });
        let b = fit_forest(RandomForestConfig { n_trees: 8, seed: 7, ..Default::default() });
        let sample = [3.0, 3.0];
        assert_eq!(
            a.predict_proba(&sample).unwrap(),
            b.predict_proba(&sample).unwrap()
        );
    }

    #[test]
    fn refit_overwrites_previous_model() {
        let mut forest = fit_forest(RandomForestConfig { n_trees: 5, ..Default::default() });
        // Retrain on constant-negative data
        let data = vec![0.0, 0.0, 1.0, 1.0];
        let labels = vec![0, 0];
        forest.fit(&data, 2, &labels, &[1.0, 1.0]).unwrap();
        assert_eq!(forest.n_trees(), 5);
        assert!(forest.predict_proba(&[0.5, 0.5]).unwrap()[1] < 1e-9);
    }

    #[test]
    fn unfitted_predict_errors() {
        let forest = RandomForest::new(RandomForestConfig::default());
        assert!(forest.predict_proba(&[0.0]).is_err());
    }

    #[test]
    fn wrong_width_errors() {
        let forest = fit_forest(RandomForestConfig { n_trees: 3, ..Default::default() });
        assert!(forest.predict_proba(&[1.0]).is_err());
        assert!(forest.predict_proba(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn invalid_inputs_error() {
        let mut forest = RandomForest::new(RandomForestConfig::default());
        assert!(forest.fit(&[], 2, &[], &[]).is_err());
        assert!(forest.fit(&[1.0, 2.0], 0, &[0], &[1.0]).is_err());
        assert!(forest.fit(&[1.0, 2.0, 3.0], 2, &[0], &[1.0]).is_err());
        assert!(forest.fit(&[1.0, 2.0], 2, &[0, 1], &[1.0]).is_err());

        let mut zero_trees = RandomForest::new(RandomForestConfig {
            n_trees: 0,
            ..Default::default()
        });
        assert!(zero_trees.fit(&[1.0, 2.0], 2, &[0], &[1.0]).is_err());
    }

    #[test]
    fn serde_round_trip_preserves_predictions() {
        let forest = fit_forest(RandomForestConfig { n_trees: 6, ..Default::default() });
        let json = serde_json::to_string(&forest).unwrap();
        let back: RandomForest = serde_json::from_str(&json).unwrap();
        let sample = [8.1, 8.9];
        assert_eq!(
            forest.predict_proba(&sample).unwrap(),
            back.predict_proba(&sample).unwrap()
        );
    }
}

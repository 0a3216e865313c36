//! The training/evaluation pipeline.
//!
//! Stages are expressed as a typestate chain: [`TrainingData`] →
//! [`SplitData`] → [`FittedModel`] → [`SweepReport`]. Each stage returns
//! the value the next stage consumes, so running stages out of order does
//! not compile, and empty inputs fail fast with a precondition error
//! instead of surfacing from the numeric code.

use serde::{Deserialize, Serialize};
use tracing::info;

use toxscreen_core::{Error, Result};

use crate::classifier::{predict_positive_batch, ProbClassifier};
use crate::forest::{RandomForest, RandomForestConfig};
use crate::metrics::{threshold_sweep, SweepRow};
use crate::sampling::{smote_oversample, train_test_split, ResampleReport};

/// Split-stage knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of rows held out for evaluation.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,

    /// Seed for the shuffle and the oversampler.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: default_test_fraction(),
            seed: default_seed(),
        }
    }
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

/// The assembled feature matrix and aligned label vector, ready to split.
#[derive(Debug, Clone)]
pub struct TrainingData {
    features: Vec<f64>,
    n_features: usize,
    labels: Vec<u8>,
}

impl TrainingData {
    /// Validate matrix/label alignment up front.
    pub fn new(features: Vec<f64>, n_features: usize, labels: Vec<u8>) -> Result<Self> {
        if n_features == 0 {
            return Err(Error::pipeline("n_features must be > 0"));
        }
        if features.len() != labels.len() * n_features {
            return Err(Error::pipeline(format!(
                "feature matrix ({} values) does not align with {} labels x {} features",
                features.len(),
                labels.len(),
                n_features
            )));
        }
        Ok(Self {
            features,
            n_features,
            labels,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }

    /// Stage 1: partition into train/test, then rebalance the training
    /// partition only. The test partition keeps the original class ratio
    /// and never sees a synthetic row.
    pub fn split(self, config: &SplitConfig) -> Result<SplitData> {
        if self.n_rows() < 2 {
            return Err(Error::pipeline(format!(
                "need at least 2 rows to split, got {}",
                self.n_rows()
            )));
        }
        if !(0.0..1.0).contains(&config.test_fraction) || config.test_fraction <= 0.0 {
            return Err(Error::pipeline(format!(
                "test_fraction must be in (0, 1), got {}",
                config.test_fraction
            )));
        }

        let (train_idx, test_idx) =
            train_test_split(self.n_rows(), config.test_fraction, config.seed);

        let take = |indices: &[usize]| -> (Vec<f64>, Vec<u8>) {
            let mut x = Vec::with_capacity(indices.len() * self.n_features);
            let mut y = Vec::with_capacity(indices.len());
            for &i in indices {
                x.extend_from_slice(
                    &self.features[i * self.n_features..(i + 1) * self.n_features],
                );
                y.push(self.labels[i]);
            }
            (x, y)
        };

        let (mut train_x, mut train_y) = take(&train_idx);
        let (test_x, test_y) = take(&test_idx);

        info!(
            train_rows = train_y.len(),
            test_rows = test_y.len(),
            "partitioned dataset"
        );

        let resample = smote_oversample(&mut train_x, self.n_features, &mut train_y, config.seed);

        Ok(SplitData {
            train_x,
            train_y,
            test_x,
            test_y,
            n_features: self.n_features,
            resample,
        })
    }
}

/// Stage-1 output: disjoint partitions plus the resampling report.
#[derive(Debug, Clone)]
pub struct SplitData {
    train_x: Vec<f64>,
    train_y: Vec<u8>,
    test_x: Vec<f64>,
    test_y: Vec<u8>,
    n_features: usize,
    pub resample: ResampleReport,
}

impl SplitData {
    pub fn train_rows(&self) -> usize {
        self.train_y.len()
    }

    pub fn test_rows(&self) -> usize {
        self.test_y.len()
    }

    pub fn test_labels(&self) -> &[u8] {
        &self.test_y
    }

    /// Stage 2 with the default tree-ensemble classifier.
    pub fn fit(self, config: &RandomForestConfig) -> Result<FittedModel<RandomForest>> {
        let forest = RandomForest::new(config.clone());
        self.fit_with(forest)
    }

    /// Stage 2: train any [`ProbClassifier`] on the resampled training
    /// partition with class-balanced sample weights.
    pub fn fit_with<C: ProbClassifier>(self, mut model: C) -> Result<FittedModel<C>> {
        if self.train_y.is_empty() {
            return Err(Error::pipeline("training partition is empty"));
        }

        let weights = balanced_weights(&self.train_y);
        model.fit(&self.train_x, self.n_features, &self.train_y, &weights)?;
        info!(rows = self.train_y.len(), "model fitted");

        Ok(FittedModel { model, split: self })
    }
}

/// Per-sample weights inversely proportional to class frequency
/// (`n / (2 * n_class)`), the class-balanced weighting scheme.
fn balanced_weights(labels: &[u8]) -> Vec<f64> {
    let n = labels.len() as f64;
    let positives = labels.iter().filter(|&&l| l == 1).count() as f64;
    let negatives = n - positives;
    labels
        .iter()
        .map(|&l| {
            let class_count = if l == 1 { positives } else { negatives };
            if class_count == 0.0 {
                1.0
            } else {
                n / (2.0 * class_count)
            }
        })
        .collect()
}

/// Stage-2 output: the fitted model still holding its held-out partition.
#[derive(Debug)]
pub struct FittedModel<C: ProbClassifier> {
    model: C,
    split: SplitData,
}

impl<C: ProbClassifier> FittedModel<C> {
    /// Stage 3: score every test row and sweep the candidate thresholds.
    pub fn evaluate(&self, thresholds: &[f64]) -> Result<SweepReport> {
        if self.split.test_y.is_empty() {
            return Err(Error::pipeline("test partition is empty"));
        }
        if thresholds.is_empty() {
            return Err(Error::pipeline("threshold grid is empty"));
        }

        let probs =
            predict_positive_batch(&self.model, &self.split.test_x, self.split.n_features)?;
        let rows = threshold_sweep(&probs, &self.split.test_y, thresholds)?;

        Ok(SweepReport {
            rows,
            test_rows: self.split.test_y.len(),
            test_positives: self.split.test_y.iter().filter(|&&l| l == 1).count(),
            resample: self.split.resample,
        })
    }

    pub fn model(&self) -> &C {
        &self.model
    }

    /// Surrender the fitted model for persistence.
    pub fn into_model(self) -> C {
        self.model
    }
}

/// Stage-3 output: the full sweep table plus run context, rendered by the
/// training command as the console report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub rows: Vec<SweepRow>,
    pub test_rows: usize,
    pub test_positives: usize,
    pub resample: ResampleReport,
}

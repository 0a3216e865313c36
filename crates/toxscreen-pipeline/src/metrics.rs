//! Binary evaluation metrics and the decision-threshold sweep.

use serde::{Deserialize, Serialize};

use toxscreen_core::{Error, Result};

/// Confusion counts for the positive (toxic) class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryCounts {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

impl BinaryCounts {
    /// Tally counts from aligned actual/predicted label slices.
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Result<Self> {
        if actual.is_empty() {
            return Err(Error::pipeline("empty label vectors"));
        }
        if actual.len() != predicted.len() {
            return Err(Error::pipeline(format!(
                "actual length {} != predicted length {}",
                actual.len(),
                predicted.len()
            )));
        }
        let mut counts = BinaryCounts::default();
        for (&a, &p) in actual.iter().zip(predicted.iter()) {
            match (a, p) {
                (1, 1) => counts.tp += 1,
                (0, 1) => counts.fp += 1,
                (0, 0) => counts.tn += 1,
                _ => counts.fn_ += 1,
            }
        }
        Ok(counts)
    }

    /// `TP / (TP + FP)`; 0.0 when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        let denom = self.tp + self.fp;
        if denom == 0 {
            0.0
        } else {
            self.tp as f64 / denom as f64
        }
    }

    /// `TP / (TP + FN)`; 0.0 when there are no actual positives.
    pub fn recall(&self) -> f64 {
        let denom = self.tp + self.fn_;
        if denom == 0 {
            0.0
        } else {
            self.tp as f64 / denom as f64
        }
    }
}

/// One row of the threshold sweep table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SweepRow {
    pub threshold: f64,
    pub recall: f64,
    pub precision: f64,
    /// How many test rows the threshold marks positive.
    pub predicted_positives: usize,
}

/// Evaluate hard predictions at each candidate threshold.
///
/// A row is predicted positive iff its probability is `>= threshold`. No
/// "best" threshold is chosen; the full table is reported and the choice
/// stays with the operator.
pub fn threshold_sweep(probs: &[f64], actual: &[u8], thresholds: &[f64]) -> Result<Vec<SweepRow>> {
    if probs.len() != actual.len() {
        return Err(Error::pipeline(format!(
            "probabilities length {} != labels length {}",
            probs.len(),
            actual.len()
        )));
    }
    let mut rows = Vec::with_capacity(thresholds.len());
    for &threshold in thresholds {
        let predicted: Vec<u8> = probs
            .iter()
            .map(|&p| u8::from(p >= threshold))
            .collect();
        let counts = BinaryCounts::from_labels(actual, &predicted)?;
        rows.push(SweepRow {
            threshold,
            recall: counts.recall(),
            precision: counts.precision(),
            predicted_positives: counts.tp + counts.fp,
        });
    }
    Ok(rows)
}

/// The default candidate grid, matching the training report.
pub fn default_thresholds() -> Vec<f64> {
    vec![0.1, 0.2, 0.3, 0.4, 0.5]
}

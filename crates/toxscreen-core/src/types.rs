//! Core types for toxscreen

use serde::{Deserialize, Serialize};

/// Outcome of a single screening request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Predicted probability exceeded the decision threshold.
    HighRisk,
    /// Predicted probability at or below the decision threshold.
    LowRisk,
    /// The structure string could not be parsed; no inference was run.
    Unrecognized,
}

/// A scored prediction for one structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub verdict: Verdict,

    /// Positive-class probability in [0, 1]. Absent when the structure
    /// was unrecognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,

    /// Decision threshold the verdict was derived with.
    pub threshold: f64,
}

impl Prediction {
    /// Classify a probability against a threshold. High-risk strictly
    /// above the threshold, matching the interactive surface.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        let verdict = if probability > threshold {
            Verdict::HighRisk
        } else {
            Verdict::LowRisk
        };
        Self {
            verdict,
            probability: Some(probability),
            threshold,
        }
    }

    /// An unrecognized-structure outcome; carries no probability.
    pub fn unrecognized(threshold: f64) -> Self {
        Self {
            verdict: Verdict::Unrecognized,
            probability: None,
            threshold,
        }
    }
}

/// Configuration record persisted alongside the model artifact.
///
/// The front end reproduces the exact feature width used at training time
/// from this record; it is immutable after training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Fingerprint width in bits.
    #[serde(default = "default_n_bits")]
    pub n_bits: usize,

    /// Morgan fingerprint radius (2 = ECFP4-like).
    #[serde(default = "default_radius")]
    pub radius: usize,

    /// Default decision threshold for the interactive surface.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Label column the model was trained against.
    #[serde(default)]
    pub label_column: String,

    /// RFC 3339 timestamp of the training run.
    #[serde(default)]
    pub trained_at: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_bits: default_n_bits(),
            radius: default_radius(),
            threshold: default_threshold(),
            label_column: String::new(),
            trained_at: None,
        }
    }
}

fn default_n_bits() -> usize {
    2048
}

fn default_radius() -> usize {
    2
}

fn default_threshold() -> f64 {
    0.3
}

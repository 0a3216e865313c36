//! The narrow model interface.
//!
//! Anything that can fit on weighted binary-labeled rows and score a
//! positive-class probability can back the pipeline and the serving path.
//! [`RandomForest`](crate::forest::RandomForest) is the one implementation
//! shipped here.

use toxscreen_core::Result;

/// A binary classifier with probability output.
pub trait ProbClassifier: Send + Sync {
    /// Train on flat row-major data.
    ///
    /// * `data` - `n_samples x n_features`, row-major
    /// * `n_features` - columns per row
    /// * `labels` - 0 (negative) or 1 (positive) per row
    /// * `weights` - per-sample training weight, same length as `labels`
    ///
    /// Repeated calls retrain from scratch.
    fn fit(&mut self, data: &[f64], n_features: usize, labels: &[u8], weights: &[f64])
        -> Result<()>;

    /// Class probabilities `[p_negative, p_positive]` for one row. The two
    /// entries sum to 1.
    fn predict_proba(&self, sample: &[f64]) -> Result<[f64; 2]>;
}

/// Positive-class probabilities for every row of a flat matrix.
pub fn predict_positive_batch<C: ProbClassifier + ?Sized>(
    model: &C,
    data: &[f64],
    n_features: usize,
) -> Result<Vec<f64>> {
    let n_samples = data.len() / n_features;
    let mut probs = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let row = &data[i * n_features..(i + 1) * n_features];
        probs.push(model.predict_proba(row)?[1]);
    }
    Ok(probs)
}

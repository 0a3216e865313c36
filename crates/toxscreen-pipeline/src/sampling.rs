//! Train/test partitioning and minority-class SMOTE oversampling.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Split `n_rows` indices into disjoint (train, test) sets after a seeded
/// shuffle. `test_fraction` of the rows (at least one, when possible) goes
/// to the test set.
pub fn train_test_split(n_rows: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut n_test = (n_rows as f64 * test_fraction).round() as usize;
    n_test = n_test.clamp(usize::from(n_rows > 1), n_rows.saturating_sub(1));

    let test = indices.split_off(n_rows - n_test);
    (indices, test)
}

/// Class counts before and after resampling, reported to the operator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResampleReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub positives_before: usize,
    pub positives_after: usize,
    /// True when resampling was skipped (no positive rows to grow from).
    pub skipped: bool,
}

/// SMOTE: grow the positive class to parity with the negative class by
/// interpolating between each sampled minority row and one of its nearest
/// minority neighbors. Appends synthetic rows to `data`/`labels` in place.
///
/// Only ever applied to the training partition. When the partition holds
/// zero positives the step is skipped with a warning instead of failing;
/// when it holds a single positive, that row is duplicated (there is no
/// neighbor to interpolate toward).
pub fn smote_oversample(
    data: &mut Vec<f64>,
    n_features: usize,
    labels: &mut Vec<u8>,
    seed: u64,
) -> ResampleReport {
    let rows_before = labels.len();
    let positives: Vec<usize> = (0..rows_before).filter(|&i| labels[i] == 1).collect();
    let negatives = rows_before - positives.len();

    let mut report = ResampleReport {
        rows_before,
        rows_after: rows_before,
        positives_before: positives.len(),
        positives_after: positives.len(),
        skipped: false,
    };

    if positives.is_empty() {
        warn!("training partition has no positive rows; skipping oversampling");
        report.skipped = true;
        return report;
    }
    if positives.len() >= negatives {
        return report;
    }

    let deficit = negatives - positives.len();
    let neighbors = minority_neighbors(data, n_features, &positives, 5);
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..deficit {
        let pick = rng.gen_range(0..positives.len());
        let base = positives[pick];
        let base_row = row(data, n_features, base);

        let synthetic: Vec<f64> = match neighbors[pick].as_slice() {
            [] => base_row.to_vec(),
            nbrs => {
                let other = nbrs[rng.gen_range(0..nbrs.len())];
                let other_row = row(data, n_features, other);
                let t: f64 = rng.gen();
                base_row
                    .iter()
                    .zip(other_row.iter())
                    .map(|(&a, &b)| a + t * (b - a))
                    .collect()
            }
        };

        data.extend_from_slice(&synthetic);
        labels.push(1);
    }

    report.rows_after = labels.len();
    report.positives_after = positives.len() + deficit;
    info!(
        before = report.rows_before,
        after = report.rows_after,
        positives_before = report.positives_before,
        positives_after = report.positives_after,
        "rebalanced training partition"
    );
    report
}

fn row(data: &[f64], n_features: usize, i: usize) -> &[f64] {
    &data[i * n_features..(i + 1) * n_features]
}

/// For each minority row, the indices of its `k` nearest minority rows by
/// squared Euclidean distance.
fn minority_neighbors(
    data: &[f64],
    n_features: usize,
    minority: &[usize],
    k: usize,
) -> Vec<Vec<usize>> {
    minority
        .iter()
        .map(|&i| {
            let mut dists: Vec<(f64, usize)> = minority
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| {
                    let d: f64 = row(data, n_features, i)
                        .iter()
                        .zip(row(data, n_features, j))
                        .map(|(&a, &b)| (a - b) * (a - b))
                        .sum();
                    (d, j)
                })
                .collect();
            dists.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            dists.into_iter().take(k).map(|(_, j)| j).collect()
        })
        .collect()
}

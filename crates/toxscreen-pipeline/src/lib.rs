//! Training and evaluation pipeline for toxscreen.
//!
//! Takes a labeled SMILES table from CSV to a persisted model: featurize
//! ([`dataset`]), partition and rebalance ([`sampling`]), fit a weighted
//! tree ensemble ([`forest`]), sweep decision thresholds ([`metrics`]),
//! and store the artifacts ([`persist`]). The [`pipeline`] module chains
//! the stages so they can only run in order.

pub mod classifier;
pub mod dataset;
pub mod forest;
pub mod metrics;
pub mod persist;
pub mod pipeline;
pub mod sampling;
pub mod tree;

pub use classifier::ProbClassifier;
pub use dataset::{load_csv, DatasetOptions, IngestStats};
pub use forest::{RandomForest, RandomForestConfig};
pub use metrics::{default_thresholds, BinaryCounts, SweepRow};
pub use persist::{load_artifacts, save_artifacts};
pub use pipeline::{FittedModel, SplitConfig, SplitData, SweepReport, TrainingData};
pub use sampling::ResampleReport;

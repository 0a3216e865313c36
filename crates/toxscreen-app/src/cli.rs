use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "toxscreen")]
#[command(
    author,
    version,
    about = "SMILES toxicity screening: train models and serve predictions"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a model from a labeled SMILES table
    Train {
        /// Input CSV with a SMILES column and binary label columns
        input: PathBuf,

        /// Column holding the SMILES strings
        #[arg(long, default_value = "smiles")]
        smiles_column: String,

        /// Binary label column to train against
        #[arg(long, default_value = "NR-AR")]
        label_column: String,

        /// Fingerprint width in bits
        #[arg(long, default_value = "2048")]
        n_bits: usize,

        /// Morgan fingerprint radius
        #[arg(long, default_value = "2")]
        radius: usize,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Number of trees in the ensemble
        #[arg(long, default_value = "100")]
        trees: usize,

        /// Depth cap per tree
        #[arg(long, default_value = "16")]
        max_depth: usize,

        /// Seed for the split, the oversampler, and the forest
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Candidate decision thresholds (comma-separated)
        #[arg(long, default_value = "0.1,0.2,0.3,0.4,0.5")]
        thresholds: String,

        /// Default threshold stored with the model for serving
        #[arg(long, default_value = "0.3")]
        default_threshold: f64,

        /// Directory to write model artifacts into
        #[arg(short, long, default_value = "./artifacts")]
        out: PathBuf,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Serve predictions from trained artifacts with a web UI
    Serve {
        /// Listen port
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Listen address
        #[arg(short, long, default_value = "127.0.0.1")]
        address: String,

        /// Directory holding the trained artifacts
        #[arg(long, default_value = "./artifacts")]
        artifacts: PathBuf,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

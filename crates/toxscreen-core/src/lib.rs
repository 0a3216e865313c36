//! toxscreen Core
//!
//! Core types, traits, and utilities shared across toxscreen components.
//!
//! This crate provides:
//! - The workspace-wide error type and result alias
//! - Screening verdicts and prediction records
//! - The persisted model configuration record

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ModelConfig, Prediction, Verdict};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ModelConfig, Prediction, Verdict};
}

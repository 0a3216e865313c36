//! Error types for toxscreen

/// Result type alias using toxscreen's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for toxscreen operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// SMILES / structure parsing errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Dataset construction errors (bad columns, empty tables)
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Training pipeline precondition and stage errors
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Model fitting/prediction errors
    #[error("model error: {0}")]
    Model(String),

    /// Artifact load/store errors
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a new pipeline error
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

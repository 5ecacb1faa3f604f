//! # Error Types
//!
//! Configuration and shape errors are reported through [`NetInfError`].
//! Stochastic search that fails to converge is not an error: PSO and ACO
//! always return their best effort.

use thiserror::Error;

/// Main error type for network inference operations
#[derive(Error, Debug)]
pub enum NetInfError {
    /// Invalid settings (PSO, ACO or model configuration)
    #[error("config error: {0}")]
    Config(String),

    /// A vector or trajectory does not have the expected size
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Graph topology does not fit the model or violates an invariant
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Node is not a member of the graph or model
    #[error("unknown node {0}")]
    UnknownNode(usize),

    /// Malformed trajectory text
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON (de)serialization failure
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetInfError>;

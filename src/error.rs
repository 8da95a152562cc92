//! Error types for slope-nn.

use thiserror::Error;

use crate::network::params::ParamId;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in the core and its loaders.
#[derive(Error, Debug)]
pub enum Error {
    /// An input or expected-output vector has the wrong length.
    #[error("size mismatch: expected {expected} values, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Cost and learning are undefined over zero samples.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Layer sizes that cannot form a network, or a loaded network whose
    /// neuron arities do not line up.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("no such parameter: {0:?}")]
    ParamOutOfRange(ParamId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed IDX or sample-text data.
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The console user did not produce a valid answer in time.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

use std::path::PathBuf;

use thiserror::Error;

use crate::filter::Dimension;

/// Errors raised while loading the casualty dataset
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file could not be read.
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not a JSON array of records.
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] simd_json::Error),

    /// The background loader went away without reporting a result.
    #[error("dataset loader stopped before finishing")]
    Disconnected,
}

/// Errors raised when a filter control emits a value outside its option set
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown {dimension} option: {value:?}")]
    UnknownOption { dimension: Dimension, value: String },
}

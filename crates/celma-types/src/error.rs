use crate::state::Dimension;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CelmaError {
    #[error("Index {index} out of range for {dimension}, as {dimension} has only {length} elements")]
    IndexOutOfRange {
        dimension: Dimension,
        index: i64,
        length: usize,
    },

    #[error("Missing grid metadata '{key}' in {path}")]
    MissingMetadata { key: String, path: String },

    #[error("Variable '{name}' not found in {path}")]
    NotFound { name: String, path: String },

    #[error("Invalid slice for {dimension}: {message}")]
    InvalidSlice {
        dimension: Dimension,
        message: String,
    },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid expression: {0}")]
    Expression(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("NPY read error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),
}

impl CelmaError {
    /// True for store-level misses, which some callers treat as optional data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CelmaError::NotFound { .. })
    }
}

pub type CelmaResult<T> = Result<T, CelmaError>;

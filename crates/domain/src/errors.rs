//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The model emitted a class index with no entry in the soil table
    #[error("Unknown class index: {0}")]
    UnknownClass(usize),

    /// The model returned no usable scores
    #[error("Model returned no class scores")]
    EmptyScores,

    /// Tensor data does not match its declared shape
    #[error("Invalid tensor shape {shape:?}: expected {expected} values, got {actual}")]
    InvalidTensorShape {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Uploaded bytes could not be decoded as an image
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Model forward pass failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Model artifact could not be fetched, verified or loaded
    #[error("Model artifact error: {0}")]
    ModelArtifact(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the error was caused by the uploaded content rather than the service
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::ImageDecode(_))
    }
}

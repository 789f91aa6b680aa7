//! Classifier port - Interface for image classification models

use async_trait::async_trait;
use domain::{ClassScores, ImageTensor};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Static facts about a loaded model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    /// Model identifier (usually the artifact file name)
    pub name: String,
    /// Square input edge length in pixels
    pub input_size: u32,
    /// Number of classes in the output vector
    pub num_classes: usize,
}

/// Port for image classification
///
/// Implementations hold an already loaded model and are shared read-only
/// across requests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClassifierPort: Send + Sync {
    /// Run the forward pass for a single-image batch
    async fn classify(&self, input: ImageTensor) -> Result<ClassScores, ApplicationError>;

    /// Describe the loaded model
    fn model_info(&self) -> ModelInfo;

    /// Check whether the model can serve requests
    async fn is_healthy(&self) -> bool;
}

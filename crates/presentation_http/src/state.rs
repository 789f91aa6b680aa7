//! Application state shared across handlers

use std::sync::Arc;

use application::ClassificationService;
use infrastructure::AppConfig;

/// Shared application state
///
/// Built once at startup and cloned into every handler. Everything behind
/// it is immutable.
#[derive(Clone)]
pub struct AppState {
    /// Classification use case
    pub classification_service: Arc<ClassificationService>,

    /// Effective configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("classification_service", &self.classification_service)
            .field("environment", &self.config.environment())
            .finish_non_exhaustive()
    }
}

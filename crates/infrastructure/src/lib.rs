//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the ONNX classifier adapter, model artifact acquisition,
//! configuration loading and logging setup.

pub mod adapters;
pub mod artifact;
pub mod config;
pub mod telemetry;
pub mod validation;

pub use adapters::*;
pub use artifact::{ArtifactError, ModelFetcher, blake3_file_digest};
pub use config::{AppConfig, Environment, LogFormat, ModelConfig, ServerConfig};
pub use telemetry::{TelemetryError, init_telemetry};
pub use validation::{SecurityValidator, SecurityWarning, WarningSeverity};

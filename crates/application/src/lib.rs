//! Application layer - Use cases and orchestration
//!
//! Contains the classifier port, image preprocessing and the classification
//! use case. Orchestrates domain objects and infrastructure adapters.

pub mod error;
pub mod ports;
pub mod preprocessing;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use preprocessing::{DEFAULT_INPUT_SIZE, ImagePreprocessor};
pub use services::*;

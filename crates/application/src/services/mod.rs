//! Application services
//!
//! Services orchestrate domain objects and ports to implement use cases.

mod classification_service;

pub use classification_service::ClassificationService;

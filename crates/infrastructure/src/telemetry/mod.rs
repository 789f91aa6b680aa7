//! Logging infrastructure
//!
//! Installs the global `tracing` subscriber in text or JSON format.

mod subscriber;

pub use subscriber::{TelemetryError, init_telemetry};

//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod onnx_classifier_adapter;

pub use onnx_classifier_adapter::OnnxClassifierAdapter;

//! Domain entities

mod soil_prediction;

pub use soil_prediction::SoilPrediction;

//! Value objects - immutable types identified by their values

mod class_scores;
mod image_tensor;
mod soil_type;

pub use class_scores::ClassScores;
pub use image_tensor::{CHANNELS, ImageTensor};
pub use soil_type::SoilType;

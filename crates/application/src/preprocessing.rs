//! Image preprocessing
//!
//! Turns uploaded bytes into the tensor the classifier expects: decode,
//! convert to RGB, resize to a fixed square, scale to `[0, 1]` and add a
//! batch axis of one.

use std::io::Cursor;

use domain::ImageTensor;
use image::{DynamicImage, ImageReader, imageops::FilterType};

use crate::error::ApplicationError;

/// Edge length the soil model was trained on
pub const DEFAULT_INPUT_SIZE: u32 = 200;

/// Converts encoded images into normalized model input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePreprocessor {
    target_size: u32,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE)
    }
}

impl ImagePreprocessor {
    /// Create a preprocessor producing `target_size x target_size` tensors
    #[must_use]
    pub const fn new(target_size: u32) -> Self {
        Self { target_size }
    }

    /// Output edge length in pixels
    #[must_use]
    pub const fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Decode and normalize an encoded image
    pub fn preprocess(&self, bytes: &[u8]) -> Result<ImageTensor, ApplicationError> {
        let image = Self::decode(bytes)?;
        self.to_tensor(&image)
    }

    /// Decode bytes in any supported format, sniffing the format from content
    pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ApplicationError> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ApplicationError::ImageDecode(e.to_string()))?
            .decode()
            .map_err(|e| ApplicationError::ImageDecode(e.to_string()))
    }

    /// Resize an already decoded image and scale its pixels to `[0, 1]`
    pub fn to_tensor(&self, image: &DynamicImage) -> Result<ImageTensor, ApplicationError> {
        let size = self.target_size;
        let rgb = image
            .resize_exact(size, size, FilterType::CatmullRom)
            .to_rgb8();

        let data = rgb
            .as_raw()
            .iter()
            .map(|&value| f32::from(value) / 255.0)
            .collect();

        Ok(ImageTensor::single(size as usize, size as usize, data)?)
    }
}

//! Image tensor value object

use crate::errors::DomainError;

/// Number of color channels fed to the classifier
pub const CHANNELS: usize = 3;

/// Dense `f32` image batch in NHWC layout
///
/// Shape is always `[batch, height, width, CHANNELS]`; the constructor
/// rejects data whose length does not match.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl ImageTensor {
    /// Build a single-image batch of `height x width` RGB pixels
    pub fn single(height: usize, width: usize, data: Vec<f32>) -> Result<Self, DomainError> {
        Self::new([1, height, width, CHANNELS], data)
    }

    /// Build a tensor with an explicit shape
    pub fn new(shape: [usize; 4], data: Vec<f32>) -> Result<Self, DomainError> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected || shape[3] != CHANNELS {
            return Err(DomainError::InvalidTensorShape {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Tensor shape as `[batch, height, width, channels]`
    #[must_use]
    pub const fn shape(&self) -> [usize; 4] {
        self.shape
    }

    /// Number of images in the batch
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.shape[0]
    }

    /// Flat values in row-major NHWC order
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consume the tensor, returning shape and data
    #[must_use]
    pub fn into_parts(self) -> ([usize; 4], Vec<f32>) {
        (self.shape, self.data)
    }
}

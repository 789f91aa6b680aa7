//! Class scores value object

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Per-class activations produced by the model for a single image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScores(Vec<f32>);

impl ClassScores {
    /// Wrap a score vector
    #[must_use]
    pub const fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    /// Number of classes scored
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector holds no scores
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Score for a class index, if present
    #[must_use]
    pub fn score(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    /// Raw scores in class index order
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Index of the highest score
    ///
    /// Ties resolve to the lowest index. NaN entries never win; a vector that
    /// is empty or entirely NaN yields [`DomainError::EmptyScores`].
    pub fn argmax(&self) -> Result<usize, DomainError> {
        let mut best: Option<(usize, f32)> = None;
        for (index, &score) in self.0.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {},
                _ => best = Some((index, score)),
            }
        }
        best.map(|(index, _)| index).ok_or(DomainError::EmptyScores)
    }
}

impl From<Vec<f32>> for ClassScores {
    fn from(scores: Vec<f32>) -> Self {
        Self::new(scores)
    }
}

//! Soil prediction entity

use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{ClassScores, SoilType},
};

/// Classification outcome for one uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilPrediction {
    /// Winning soil class
    pub soil_type: SoilType,
    /// Score of the winning class as emitted by the model
    pub confidence: f32,
}

impl SoilPrediction {
    /// Resolve the arg-max of `scores` against the soil table
    pub fn from_scores(scores: &ClassScores) -> Result<Self, DomainError> {
        let index = scores.argmax()?;
        let soil_type = SoilType::from_class_index(index)?;
        let confidence = scores.score(index).ok_or(DomainError::EmptyScores)?;
        Ok(Self {
            soil_type,
            confidence,
        })
    }

    /// Class index of the prediction
    #[must_use]
    pub const fn class_index(&self) -> usize {
        self.soil_type.class_index()
    }

    /// Label of the predicted soil
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.soil_type.label()
    }

    /// Description of the predicted soil
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.soil_type.description()
    }
}

//! Soil type value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Soil class recognized by the classifier
///
/// The discriminant order is the model's output order: class index 0 is
/// `Alluvial`, 1 is `Black`, 2 is `Laterite`, 3 is `Yellow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    /// Alluvial soil (class 0)
    Alluvial,
    /// Black / Regur soil (class 1)
    Black,
    /// Laterite soil (class 2)
    Laterite,
    /// Yellow soil (class 3)
    Yellow,
}

impl SoilType {
    /// Number of soil classes the table covers
    pub const COUNT: usize = 4;

    /// All soil types in class index order
    #[must_use]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::Alluvial, Self::Black, Self::Laterite, Self::Yellow]
    }

    /// Look up the soil type for a model class index
    pub fn from_class_index(index: usize) -> Result<Self, DomainError> {
        match index {
            0 => Ok(Self::Alluvial),
            1 => Ok(Self::Black),
            2 => Ok(Self::Laterite),
            3 => Ok(Self::Yellow),
            other => Err(DomainError::UnknownClass(other)),
        }
    }

    /// Model class index of this soil type
    #[must_use]
    pub const fn class_index(self) -> usize {
        match self {
            Self::Alluvial => 0,
            Self::Black => 1,
            Self::Laterite => 2,
            Self::Yellow => 3,
        }
    }

    /// Human-readable label returned to clients
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Alluvial => "Alluvial Soil",
            Self::Black => "Black Soil",
            Self::Laterite => "Laterite Soil",
            Self::Yellow => "Yellow Soil",
        }
    }

    /// Short description returned to clients
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Alluvial => "Highly fertile soil formed by water deposits.",
            Self::Black => {
                "Also known as Regur soil, it is rich in clay and moisture-retaining properties"
            },
            Self::Laterite => {
                "Rich in iron and aluminum, It is low in fertility but can be improved with organic matter."
            },
            Self::Yellow => "Moderately fertile soil derived from crystalline rocks.",
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<usize> for SoilType {
    type Error = DomainError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_class_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_model_output_cardinality() {
        assert_eq!(SoilType::all().len(), SoilType::COUNT);
        for index in 0..SoilType::COUNT {
            assert!(SoilType::from_class_index(index).is_ok());
        }
    }

    #[test]
    fn class_index_round_trips_through_table() {
        for soil in SoilType::all() {
            assert_eq!(SoilType::from_class_index(soil.class_index()), Ok(soil));
        }
    }

    #[test]
    fn all_is_in_class_index_order() {
        for (index, soil) in SoilType::all().into_iter().enumerate() {
            assert_eq!(soil.class_index(), index);
        }
    }

    #[test]
    fn index_past_table_is_unknown() {
        assert_eq!(
            SoilType::from_class_index(SoilType::COUNT),
            Err(DomainError::UnknownClass(4))
        );
    }

    #[test]
    fn alluvial_metadata() {
        let soil = SoilType::Alluvial;
        assert_eq!(soil.label(), "Alluvial Soil");
        assert_eq!(
            soil.description(),
            "Highly fertile soil formed by water deposits."
        );
    }

    #[test]
    fn black_metadata() {
        assert_eq!(SoilType::Black.label(), "Black Soil");
        assert!(SoilType::Black.description().contains("Regur"));
    }

    #[test]
    fn labels_are_unique() {
        let labels: std::collections::HashSet<_> =
            SoilType::all().iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), SoilType::COUNT);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(SoilType::Laterite.to_string(), "Laterite Soil");
    }

    #[test]
    fn try_from_usize() {
        assert_eq!(SoilType::try_from(3), Ok(SoilType::Yellow));
        assert!(SoilType::try_from(9).is_err());
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&SoilType::Yellow).unwrap();
        assert_eq!(json, "\"yellow\"");
    }
}

//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{ClassScores, DomainError, ImageTensor, SoilPrediction, SoilType};
use proptest::prelude::*;

// ============================================================================
// ClassScores Property Tests
// ============================================================================

mod class_scores_tests {
    use super::*;

    proptest! {
        #[test]
        fn argmax_is_in_bounds(scores in prop::collection::vec(-100.0f32..100.0f32, 1..32)) {
            let index = ClassScores::new(scores.clone()).argmax().unwrap();
            prop_assert!(index < scores.len());
        }

        #[test]
        fn argmax_score_dominates(scores in prop::collection::vec(-100.0f32..100.0f32, 1..32)) {
            let wrapped = ClassScores::new(scores.clone());
            let best = wrapped.score(wrapped.argmax().unwrap()).unwrap();
            prop_assert!(scores.iter().all(|&s| s <= best));
        }

        #[test]
        fn argmax_is_first_of_maxima(scores in prop::collection::vec(0u8..4, 1..16)) {
            let floats: Vec<f32> = scores.iter().map(|&s| f32::from(s)).collect();
            let index = ClassScores::new(floats.clone()).argmax().unwrap();
            prop_assert!(floats[..index].iter().all(|&s| s < floats[index]));
        }
    }
}

// ============================================================================
// SoilPrediction Property Tests
// ============================================================================

mod soil_prediction_tests {
    use super::*;

    proptest! {
        #[test]
        fn four_class_scores_always_resolve(scores in prop::collection::vec(0.0f32..1.0f32, SoilType::COUNT)) {
            let prediction = SoilPrediction::from_scores(&ClassScores::new(scores));
            prop_assert!(prediction.is_ok());
            prop_assert!(prediction.unwrap().class_index() < SoilType::COUNT);
        }

        #[test]
        fn indices_past_table_never_resolve(index in SoilType::COUNT..1000usize) {
            prop_assert_eq!(SoilType::from_class_index(index), Err(DomainError::UnknownClass(index)));
        }
    }
}

// ============================================================================
// ImageTensor Property Tests
// ============================================================================

mod image_tensor_tests {
    use super::*;

    proptest! {
        #[test]
        fn single_accepts_exact_length(h in 1usize..32, w in 1usize..32) {
            let tensor = ImageTensor::single(h, w, vec![0.5; h * w * 3]);
            prop_assert!(tensor.is_ok());
            prop_assert_eq!(tensor.unwrap().shape(), [1, h, w, 3]);
        }

        #[test]
        fn single_rejects_wrong_length(h in 1usize..32, w in 1usize..32, extra in 1usize..8) {
            prop_assert!(ImageTensor::single(h, w, vec![0.5; h * w * 3 + extra]).is_err());
        }
    }
}

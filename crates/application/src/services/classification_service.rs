//! Classification service - Upload to soil prediction

use std::{fmt, sync::Arc, time::Instant};

use domain::SoilPrediction;
use tracing::{debug, instrument};

use crate::{
    error::ApplicationError,
    ports::{ClassifierPort, ModelInfo},
    preprocessing::ImagePreprocessor,
};

/// Service that turns uploaded image bytes into a soil prediction
pub struct ClassificationService {
    classifier: Arc<dyn ClassifierPort>,
    preprocessor: ImagePreprocessor,
}

impl fmt::Debug for ClassificationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationService")
            .field("preprocessor", &self.preprocessor)
            .finish_non_exhaustive()
    }
}

impl ClassificationService {
    /// Create a service whose preprocessing matches the model's input size
    pub fn new(classifier: Arc<dyn ClassifierPort>) -> Self {
        let preprocessor = ImagePreprocessor::new(classifier.model_info().input_size);
        Self {
            classifier,
            preprocessor,
        }
    }

    /// Create a service with an explicit preprocessor
    pub fn with_preprocessor(
        classifier: Arc<dyn ClassifierPort>,
        preprocessor: ImagePreprocessor,
    ) -> Self {
        Self {
            classifier,
            preprocessor,
        }
    }

    /// Classify an encoded image
    ///
    /// Decoding and resizing run on the blocking pool; the forward pass is
    /// delegated to the classifier port.
    #[instrument(skip(self, image), fields(image_len = image.len()))]
    pub async fn classify_image(&self, image: Vec<u8>) -> Result<SoilPrediction, ApplicationError> {
        let start = Instant::now();

        let preprocessor = self.preprocessor;
        let tensor = tokio::task::spawn_blocking(move || preprocessor.preprocess(&image))
            .await
            .map_err(|e| ApplicationError::Internal(format!("Preprocessing task failed: {e}")))??;

        let scores = self.classifier.classify(tensor).await?;
        let prediction = SoilPrediction::from_scores(&scores)?;

        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(
            class_index = prediction.class_index(),
            soil_type = %prediction.soil_type,
            confidence = prediction.confidence,
            latency_ms = latency_ms,
            "Image classified"
        );

        Ok(prediction)
    }

    /// Check if the underlying classifier is healthy
    pub async fn is_ready(&self) -> bool {
        self.classifier.is_healthy().await
    }

    /// Describe the loaded model
    pub fn model_info(&self) -> ModelInfo {
        self.classifier.model_info()
    }

    /// Preprocessor used for uploads
    pub const fn preprocessor(&self) -> ImagePreprocessor {
        self.preprocessor
    }
}

//! ONNX classifier adapter - Implements ClassifierPort using tract

use std::{fmt, path::Path, sync::Arc, time::Instant};

use application::{
    error::ApplicationError,
    ports::{ClassifierPort, ModelInfo},
};
use async_trait::async_trait;
use domain::{CHANNELS, ClassScores, ImageTensor, SoilType};
use tract_onnx::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::ModelConfig;

type Plan = TypedRunnableModel<TypedModel>;

/// Adapter running an ONNX image classifier in-process
///
/// The model expects NHWC `f32` input of shape `[1, size, size, 3]` and emits
/// one score per soil class. The optimized plan is immutable and shared by
/// all requests.
pub struct OnnxClassifierAdapter {
    plan: Arc<Plan>,
    info: ModelInfo,
}

impl fmt::Debug for OnnxClassifierAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxClassifierAdapter")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifierAdapter {
    /// Load the model described by the configuration
    pub fn from_config(config: &ModelConfig) -> Result<Self, ApplicationError> {
        Self::load(&config.path, config.input_size)
    }

    /// Load, type-check and optimize an ONNX model
    ///
    /// Fails when the file cannot be parsed or when the model's output
    /// cardinality does not match the soil table.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path, input_size: u32) -> Result<Self, ApplicationError> {
        let start = Instant::now();
        let size = input_size as usize;

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| {
                m.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, size, size, CHANNELS)),
                )
            })
            .and_then(|m| m.into_optimized())
            .map_err(|e| ApplicationError::ModelArtifact(format!("{e:#}")))?;

        let output_shape = model
            .output_fact(0)
            .map_err(|e| ApplicationError::ModelArtifact(format!("{e:#}")))?
            .shape
            .as_concrete()
            .map(<[usize]>::to_vec);
        let num_classes = output_classes(output_shape.as_deref())?;

        let plan = model
            .into_runnable()
            .map_err(|e| ApplicationError::ModelArtifact(format!("{e:#}")))?;

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        info!(
            model = %name,
            input_size,
            num_classes,
            load_ms = start.elapsed().as_millis() as u64,
            "Classifier model loaded"
        );

        Ok(Self {
            plan: Arc::new(plan),
            info: ModelInfo {
                name,
                input_size,
                num_classes,
            },
        })
    }

    fn run(plan: &Plan, input: ImageTensor) -> Result<ClassScores, ApplicationError> {
        let (shape, data) = input.into_parts();
        let tensor = Tensor::from_shape(&shape, &data)
            .map_err(|e| ApplicationError::Inference(format!("{e:#}")))?;

        let outputs = plan
            .run(tvec!(tensor.into()))
            .map_err(|e| ApplicationError::Inference(format!("{e:#}")))?;

        let first = outputs
            .first()
            .ok_or_else(|| ApplicationError::Inference("Model produced no outputs".to_string()))?;
        scores_from_output(first)
    }
}

/// Number of classes encoded in a `[1, classes]` or `[classes]` output shape
fn output_classes(shape: Option<&[usize]>) -> Result<usize, ApplicationError> {
    let classes = match shape {
        Some([classes] | [1, classes]) => *classes,
        Some(other) => {
            return Err(ApplicationError::ModelArtifact(format!(
                "Unsupported model output shape {other:?}"
            )));
        },
        None => {
            return Err(ApplicationError::ModelArtifact(
                "Model output shape is not concrete".to_string(),
            ));
        },
    };

    if classes != SoilType::COUNT {
        return Err(ApplicationError::Configuration(format!(
            "Model emits {classes} classes but the soil table has {}",
            SoilType::COUNT
        )));
    }
    Ok(classes)
}

/// Flatten the model's first output into class scores
fn scores_from_output(output: &Tensor) -> Result<ClassScores, ApplicationError> {
    let view = output
        .to_array_view::<f32>()
        .map_err(|e| ApplicationError::Inference(format!("{e:#}")))?;
    Ok(ClassScores::new(view.iter().copied().collect()))
}

#[async_trait]
impl ClassifierPort for OnnxClassifierAdapter {
    #[instrument(skip(self, input), fields(shape = ?input.shape()))]
    async fn classify(&self, input: ImageTensor) -> Result<ClassScores, ApplicationError> {
        let size = self.info.input_size as usize;
        let expected = [1, size, size, CHANNELS];
        if input.shape() != expected {
            return Err(ApplicationError::Inference(format!(
                "Expected input shape {expected:?}, got {:?}",
                input.shape()
            )));
        }

        let start = Instant::now();
        let plan = Arc::clone(&self.plan);
        let scores = tokio::task::spawn_blocking(move || Self::run(&plan, input))
            .await
            .map_err(|e| ApplicationError::Internal(format!("Inference task failed: {e}")))??;

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            "Forward pass completed"
        );

        Ok(scores)
    }

    fn model_info(&self) -> ModelInfo {
        self.info.clone()
    }

    async fn is_healthy(&self) -> bool {
        // The plan is fully built at load time; nothing can degrade afterwards.
        true
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn output_classes_accepts_batched_shape() {
        assert_eq!(output_classes(Some(&[1, 4][..])).unwrap(), 4);
    }

    #[test]
    fn output_classes_accepts_flat_shape() {
        assert_eq!(output_classes(Some(&[4][..])).unwrap(), 4);
    }

    #[test]
    fn output_classes_rejects_table_mismatch() {
        let err = output_classes(Some(&[1, 5][..])).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
        assert!(err.to_string().contains("5 classes"));
    }

    #[test]
    fn output_classes_rejects_spatial_output() {
        assert!(output_classes(Some(&[1, 7, 7, 4][..])).is_err());
    }

    #[test]
    fn output_classes_rejects_symbolic_shape() {
        assert!(output_classes(None).is_err());
    }

    #[test]
    fn scores_from_batched_output() {
        let tensor = Tensor::from_shape(&[1, 4], &[0.1f32, 0.2, 0.6, 0.1]).unwrap();
        let scores = scores_from_output(&tensor).unwrap();
        assert_eq!(scores.as_slice(), &[0.1, 0.2, 0.6, 0.1]);
        assert_eq!(scores.argmax().unwrap(), 2);
    }

    #[test]
    fn scores_from_non_float_output_fails() {
        let tensor = Tensor::from_shape(&[1, 2], &[1i64, 2]).unwrap();
        assert!(scores_from_output(&tensor).is_err());
    }

    #[test]
    fn load_missing_file_fails() {
        let err = OnnxClassifierAdapter::load(Path::new("/nonexistent/soil_model.onnx"), 200)
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ModelArtifact(_)));
    }

    #[test]
    fn load_garbage_file_fails() {
        let mut file = tempfile::Builder::new().suffix(".onnx").tempfile().unwrap();
        file.write_all(b"this is not a protobuf model").unwrap();

        let err = OnnxClassifierAdapter::load(file.path(), 200).unwrap_err();
        assert!(matches!(err, ApplicationError::ModelArtifact(_)));
    }
}

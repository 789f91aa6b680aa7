//! Soil prediction handler

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use domain::SoilPrediction;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    error::{ApiError, NO_FILE_SELECTED, NO_FILE_UPLOADED},
    state::AppState,
};

/// Name of the multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Prediction response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Display label of the predicted soil type
    pub soil_type: String,
    /// Short description of the predicted soil type
    pub description: String,
}

impl From<&SoilPrediction> for PredictResponse {
    fn from(prediction: &SoilPrediction) -> Self {
        Self {
            soil_type: prediction.label().to_string(),
            description: prediction.description().to_string(),
        }
    }
}

/// Classify an uploaded soil image
///
/// Expects `multipart/form-data` with the image under the `file` field.
#[instrument(skip_all)]
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "Request is not a multipart upload");
        ApiError::BadRequest(NO_FILE_UPLOADED.to_string())
    })?;

    let image = read_file_field(&mut multipart).await?;
    let prediction = state.classification_service.classify_image(image).await?;

    info!(
        soil_type = %prediction.soil_type,
        confidence = prediction.confidence,
        "Prediction served"
    );

    Ok(Json(PredictResponse::from(&prediction)))
}

/// Read the bytes of the first `file` part that carries a filename
async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        match field.file_name() {
            // A plain form value, not a file
            None => continue,
            Some("") => return Err(ApiError::BadRequest(NO_FILE_SELECTED.to_string())),
            Some(name) => debug!(file_name = %name, "Reading uploaded file"),
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(bytes.to_vec());
    }

    Err(ApiError::BadRequest(NO_FILE_UPLOADED.to_string()))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        debug!(error = %err, "Malformed multipart body");
        ApiError::BadRequest(NO_FILE_UPLOADED.to_string())
    }
}

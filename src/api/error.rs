//! Error responses for the upload API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::google::PipelineError;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request carried no `file` part.
    #[error("No file part")]
    NoFilePart,

    /// The `file` part had an empty filename.
    #[error("No selected file")]
    NoSelectedFile,

    /// The request body exceeded the configured upload limit.
    #[error("Error processing upload: {0}")]
    PayloadTooLarge(String),

    /// The multipart stream broke while reading the file.
    #[error("Error processing upload: {0}")]
    Multipart(String),

    /// Saving the upload or authenticating failed.
    #[error("Error processing upload: {0}")]
    Processing(String),

    /// A remote pipeline step failed.
    #[error("Error extracting text from PDF: {0}")]
    Extraction(PipelineError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFilePart | Self::NoSelectedFile => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Multipart(_) | Self::Processing(_) | Self::Extraction(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Authentication(_) => Self::Processing(err.to_string()),
            other => Self::Extraction(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

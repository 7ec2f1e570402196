//! PDF upload handler.
//!
//! Accepts a multipart `file` part, stores it as a transient file, drives
//! the Drive/Docs pipeline and returns the extracted text.

use axum::{
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    response::Json,
};
use axum::http::StatusCode;
use serde::Serialize;

use super::error::ApiError;
use crate::AppState;
use crate::pipeline::extract_pdf_text;
use crate::transient::TransientFile;

/// Multipart field carrying the PDF.
const FILE_FIELD: &str = "file";

/// Response for a successful extraction.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub extracted_text: String,
}

/// A file part read from the request.
struct ReceivedFile {
    filename: String,
    data: Vec<u8>,
}

/// Upload a PDF and extract its text.
///
/// POST /upload
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    match process_upload(&state, multipart).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            tracing::error!(
                name: "upload.failed",
                status = %err.status(),
                error = %err,
                "Upload request failed"
            );
            Err(err)
        }
    }
}

async fn process_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadResponse, ApiError> {
    // A body that is not multipart has no file part.
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Request is not multipart");
        ApiError::NoFilePart
    })?;
    let received = read_file_part(multipart).await?;

    tracing::info!(
        name: "upload.received",
        filename = %received.filename,
        size = received.data.len(),
        "File uploaded"
    );

    let transient = TransientFile::create(
        &state.config.server.transient_dir(),
        &received.filename,
        &received.data,
    )
    .await
    .map_err(|e| ApiError::Processing(format!("failed to save upload: {e}")))?;
    drop(received.data);

    let clients = state.authenticator.authenticate().await?;
    let extracted_text = extract_pdf_text(&clients, transient.path()).await?;

    // Remove the transient file before answering.
    drop(transient);

    tracing::info!(
        name: "upload.completed",
        filename = %received.filename,
        chars = extracted_text.chars().count(),
        "Text extracted successfully from PDF"
    );

    Ok(UploadResponse {
        message: format!(
            "File '{}' uploaded and text extracted successfully.",
            received.filename
        ),
        extracted_text,
    })
}

/// Find the `file` part and read it fully.
async fn read_file_part(mut multipart: Multipart) -> Result<ReceivedFile, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // A part without a filename attribute is a form field, not a file.
        let filename = match field.file_name() {
            None => continue,
            Some("") => return Err(ApiError::NoSelectedFile),
            Some(name) => name.to_string(),
        };

        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(ReceivedFile {
            filename,
            data: data.to_vec(),
        });
    }

    Err(ApiError::NoFilePart)
}

/// Keep the size cause of an over-limit body; other stream failures are 500s.
fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::Multipart(err.body_text())
    }
}

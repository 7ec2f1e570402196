//! Google Drive v3 client: resumable upload and convert-by-copy.

use async_trait::async_trait;
use reqwest::header::LOCATION;
use serde::Deserialize;
use serde_json::json;

use super::provider::{DocumentId, FileId, PipelineError, StorageClient};

/// Name given to every uploaded file.
const UPLOADED_FILE_NAME: &str = "Uploaded PDF";

const UPLOAD_MISSING_ID: &str = "Failed to upload the PDF to Google Drive.";
const CONVERT_MISSING_ID: &str = "Failed to convert the PDF to Google Docs format.";

#[derive(Debug, Deserialize)]
struct FileResource {
    #[serde(default)]
    id: Option<String>,
}

/// Drive client bound to one access token.
#[derive(Debug, Clone)]
pub struct DriveClient {
    client: reqwest::Client,
    access_token: String,
    api_base: String,
    upload_base: String,
}

impl DriveClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        api_base: &str,
        upload_base: &str,
    ) -> Self {
        Self {
            client,
            access_token,
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
        }
    }

    /// Open a resumable upload session and return its session URI.
    async fn start_resumable_session(
        &self,
        mime_type: &str,
        content_length: usize,
    ) -> Result<String, PipelineError> {
        let url = format!("{}/upload/drive/v3/files", self.upload_base);

        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "resumable"), ("fields", "id")])
            .bearer_auth(&self.access_token)
            .header("X-Upload-Content-Type", mime_type)
            .header("X-Upload-Content-Length", content_length.to_string())
            .json(&json!({ "name": UPLOADED_FILE_NAME, "mimeType": mime_type }))
            .send()
            .await
            .map_err(|e| PipelineError::Upload(format!("Drive upload session request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upload(format!(
                "Drive refused the upload session ({status}): {error_text}"
            )));
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                PipelineError::Upload("Drive returned no resumable session URI".to_string())
            })
    }
}

#[async_trait]
impl StorageClient for DriveClient {
    async fn upload(&self, data: Vec<u8>, mime_type: &str) -> Result<FileId, PipelineError> {
        let size = data.len();
        let session_uri = self.start_resumable_session(mime_type, size).await?;

        let response = self
            .client
            .put(&session_uri)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(data)
            .send()
            .await
            .map_err(|e| PipelineError::Upload(format!("Drive upload request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upload(format!(
                "Drive upload error ({status}): {error_text}"
            )));
        }

        let resource: FileResource = response
            .json()
            .await
            .map_err(|e| PipelineError::Upload(format!("malformed Drive upload response: {e}")))?;

        let id = resource
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PipelineError::Upload(UPLOAD_MISSING_ID.to_string()))?;

        tracing::info!(
            name: "drive.upload.completed",
            file_id = %id,
            size = size,
            "File uploaded to Google Drive"
        );

        Ok(FileId(id))
    }

    async fn convert(
        &self,
        file_id: &FileId,
        target_mime_type: &str,
    ) -> Result<DocumentId, PipelineError> {
        let url = format!("{}/drive/v3/files/{}/copy", self.api_base, file_id);

        let response = self
            .client
            .post(&url)
            .query(&[("fields", "id")])
            .bearer_auth(&self.access_token)
            .json(&json!({ "mimeType": target_mime_type }))
            .send()
            .await
            .map_err(|e| PipelineError::Conversion(format!("Drive copy request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Conversion(format!(
                "Drive copy error ({status}): {error_text}"
            )));
        }

        let resource: FileResource = response.json().await.map_err(|e| {
            PipelineError::Conversion(format!("malformed Drive copy response: {e}"))
        })?;

        let id = resource
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PipelineError::Conversion(CONVERT_MISSING_ID.to_string()))?;

        tracing::info!(
            name: "drive.convert.completed",
            file_id = %file_id,
            document_id = %id,
            "PDF converted to Google Doc"
        );

        Ok(DocumentId(id))
    }
}

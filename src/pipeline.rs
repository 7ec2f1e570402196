//! Upload → convert → fetch → extract.

use std::path::Path;

use crate::google::{
    GOOGLE_DOCS_MIME_TYPE, PDF_MIME_TYPE, PipelineError, ServiceClients, extract_text,
};

/// Run the remote pipeline for the PDF at `pdf_path`.
///
/// Steps run strictly in sequence and the first failure is returned as is;
/// nothing is retried.
pub async fn extract_pdf_text(
    clients: &ServiceClients,
    pdf_path: &Path,
) -> Result<String, PipelineError> {
    let data = tokio::fs::read(pdf_path).await.map_err(|e| {
        PipelineError::Upload(format!("cannot read {}: {e}", pdf_path.display()))
    })?;

    tracing::info!(
        name: "drive.upload.started",
        path = %pdf_path.display(),
        size = data.len(),
        "Sending file to Google Drive"
    );
    let file_id = clients.storage.upload(data, PDF_MIME_TYPE).await?;

    let document_id = clients
        .storage
        .convert(&file_id, GOOGLE_DOCS_MIME_TYPE)
        .await?;

    let document = clients.documents.fetch_content(&document_id).await?;

    Ok(extract_text(&document))
}

//! Core traits and types shared by the Google service clients.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use super::content::Document;

/// MIME type of the uploaded payload.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// MIME type Drive converts into when copying a file as a Google Doc.
pub const GOOGLE_DOCS_MIME_TYPE: &str = "application/vnd.google-apps.document";

/// Opaque identifier of a file stored in Drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileId(pub String);

/// Opaque identifier of a Google Docs document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised by the remote steps of the extraction pipeline.
///
/// Each variant names the step it came from so the message surfaced to the
/// caller identifies where the pipeline stopped.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The service account could not be loaded or was rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The PDF could not be stored in Drive.
    #[error("upload step: {0}")]
    Upload(String),

    /// Drive did not produce a Google Docs copy of the upload.
    #[error("conversion step: {0}")]
    Conversion(String),

    /// The converted document could not be read back.
    #[error("fetch step: {0}")]
    Fetch(String),
}

/// Remote file storage with server-side format conversion.
#[async_trait]
pub trait StorageClient: Send + Sync + fmt::Debug {
    /// Store a binary blob and return its identifier.
    async fn upload(&self, data: Vec<u8>, mime_type: &str) -> Result<FileId, PipelineError>;

    /// Copy a stored file into `target_mime_type`, returning the new document.
    async fn convert(
        &self,
        file_id: &FileId,
        target_mime_type: &str,
    ) -> Result<DocumentId, PipelineError>;
}

/// Remote reader for structured document content.
#[async_trait]
pub trait DocumentReader: Send + Sync + fmt::Debug {
    /// Fetch the content tree of a document in a single round trip.
    async fn fetch_content(&self, document_id: &DocumentId) -> Result<Document, PipelineError>;
}

/// Authenticated handles produced by an [`Authenticator`].
#[derive(Debug, Clone)]
pub struct ServiceClients {
    pub storage: Arc<dyn StorageClient>,
    pub documents: Arc<dyn DocumentReader>,
}

/// Produces authenticated service clients. Called once per request.
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    async fn authenticate(&self) -> Result<ServiceClients, PipelineError>;
}

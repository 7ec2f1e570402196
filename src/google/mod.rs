//! Google Drive and Docs integration.
//!
//! # Components
//!
//! - [`ServiceAccountAuthenticator`] - JWT bearer grant for a service account
//! - [`DriveClient`] - upload a PDF and convert it into a Google Doc
//! - [`DocsClient`] - fetch a document's structured content
//! - [`content`] - content tree model and plain-text extraction
//!
//! The clients sit behind [`StorageClient`], [`DocumentReader`] and
//! [`Authenticator`] so the upload endpoint can run against other backends.

pub mod content;
mod credentials;
mod docs;
mod drive;
mod provider;

pub use content::{Document, extract_text};
pub use credentials::{
    DOCUMENTS_SCOPE, DRIVE_SCOPE, SCOPES, ServiceAccountAuthenticator, ServiceAccountKey,
};
pub use docs::DocsClient;
pub use drive::DriveClient;
pub use provider::{
    Authenticator, DocumentId, DocumentReader, FileId, GOOGLE_DOCS_MIME_TYPE, PDF_MIME_TYPE,
    PipelineError, ServiceClients, StorageClient,
};

//! Drive Text Extract
//!
//! A single-endpoint HTTP service that turns an uploaded PDF into plain text
//! by round-tripping it through Google Drive's PDF → Google Docs conversion.
//!
//! # Architecture
//!
//! - **Server**: Axum router with CORS, tracing and a body limit
//! - **API**: `POST /upload` multipart handler and JSON error responses
//! - **Pipeline**: upload → convert → fetch → extract, first failure wins
//! - **Google**: service account auth, Drive and Docs clients, content tree
//!
//! # Modules
//!
//! - [`api`]: HTTP handlers and error mapping
//! - [`config`]: Layered configuration (defaults, file, env, CLI)
//! - [`google`]: Google API clients and the text extractor
//! - [`pipeline`]: Sequencing of the remote steps
//! - [`transient`]: Request-scoped temporary files

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod google;
pub mod pipeline;
pub mod server;
pub mod transient;

use crate::config::AppConfig;
use crate::google::Authenticator;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Global Configuration
    pub config: Arc<AppConfig>,
    /// Produces authenticated Drive/Docs clients, once per request.
    pub authenticator: Arc<dyn Authenticator>,
}

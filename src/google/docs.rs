//! Google Docs v1 client.

use async_trait::async_trait;

use super::content::Document;
use super::provider::{DocumentId, DocumentReader, PipelineError};

/// Docs client bound to one access token.
#[derive(Debug, Clone)]
pub struct DocsClient {
    client: reqwest::Client,
    access_token: String,
    api_base: String,
}

impl DocsClient {
    pub fn new(client: reqwest::Client, access_token: String, api_base: &str) -> Self {
        Self {
            client,
            access_token,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DocumentReader for DocsClient {
    async fn fetch_content(&self, document_id: &DocumentId) -> Result<Document, PipelineError> {
        if document_id.0.is_empty() {
            return Err(PipelineError::Fetch("empty document identifier".to_string()));
        }

        let url = format!("{}/v1/documents/{}", self.api_base, document_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(format!("Docs request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Fetch(format!(
                "Docs API error ({status}): {error_text}"
            )));
        }

        let document: Document = response
            .json()
            .await
            .map_err(|e| PipelineError::Fetch(format!("malformed Docs response: {e}")))?;

        tracing::info!(
            name: "docs.fetch.completed",
            document_id = %document_id,
            "Retrieved Google Doc content"
        );

        Ok(document)
    }
}

//! Service account authentication for Drive and Docs.
//!
//! Implements the OAuth 2.0 JWT bearer grant: a claim set signed with the
//! service account's RSA key is exchanged at the token endpoint for a
//! short-lived access token.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::docs::DocsClient;
use super::drive::DriveClient;
use super::provider::{Authenticator, PipelineError, ServiceClients};
use crate::config::GoogleConfig;

/// Full Drive access.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Full Docs access.
pub const DOCUMENTS_SCOPE: &str = "https://www.googleapis.com/auth/documents";

/// Scopes requested for every token.
pub const SCOPES: [&str; 2] = [DRIVE_SCOPE, DOCUMENTS_SCOPE];

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The subset of a service account key file we need.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Read and parse a key file.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Authentication(format!(
                "cannot read credentials file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, PipelineError> {
        let key: Self = serde_json::from_str(raw).map_err(|e| {
            PipelineError::Authentication(format!("malformed service account key: {e}"))
        })?;

        if key.client_email.trim().is_empty() {
            return Err(PipelineError::Authentication(
                "service account key has an empty client_email".to_string(),
            ));
        }
        if key.private_key.trim().is_empty() {
            return Err(PipelineError::Authentication(
                "service account key has an empty private_key".to_string(),
            ));
        }

        Ok(key)
    }

    /// Sign a JWT bearer assertion for `scopes`, addressed to `audience`.
    pub fn sign_assertion(
        &self,
        scopes: &[&str],
        audience: &str,
        issued_at: i64,
    ) -> Result<String, PipelineError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: scopes.join(" "),
            aud: audience,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.private_key_id);

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            PipelineError::Authentication(format!("invalid service account private key: {e}"))
        })?;

        encode(&header, &claims, &key)
            .map_err(|e| PipelineError::Authentication(format!("failed to sign assertion: {e}")))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Authenticates with a service account key file on every call.
#[derive(Debug, Clone)]
pub struct ServiceAccountAuthenticator {
    client: reqwest::Client,
    config: GoogleConfig,
}

impl ServiceAccountAuthenticator {
    pub fn new(config: GoogleConfig) -> Result<Self, PipelineError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| PipelineError::Authentication(format!("http client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Exchange a signed assertion for an access token.
    pub async fn fetch_access_token(&self) -> Result<String, PipelineError> {
        let key = ServiceAccountKey::from_file(&self.config.credentials_file)?;

        let token_uri = self
            .config
            .token_uri
            .clone()
            .or_else(|| key.token_uri.clone())
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        let assertion = key.sign_assertion(&SCOPES, &token_uri, chrono::Utc::now().timestamp())?;

        let response = self
            .client
            .post(&token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| PipelineError::Authentication(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Authentication(format!(
                "token endpoint rejected the service account ({status}): {error_text}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            PipelineError::Authentication(format!("malformed token response: {e}"))
        })?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                PipelineError::Authentication("token response carried no access_token".to_string())
            })?;

        tracing::debug!(
            name: "google.auth.token_issued",
            client_email = %key.client_email,
            "Obtained access token"
        );

        Ok(access_token)
    }
}

#[async_trait]
impl Authenticator for ServiceAccountAuthenticator {
    async fn authenticate(&self) -> Result<ServiceClients, PipelineError> {
        let token = self.fetch_access_token().await?;

        let drive = DriveClient::new(
            self.client.clone(),
            token.clone(),
            &self.config.drive_api_base,
            &self.config.drive_upload_base,
        );
        let docs = DocsClient::new(self.client.clone(), token, &self.config.docs_api_base);

        Ok(ServiceClients {
            storage: Arc::new(drive),
            documents: Arc::new(docs),
        })
    }
}

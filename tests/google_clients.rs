//! Google client tests against a mocked Drive/Docs/OAuth backend.
//!
//! The service account fixture carries a throwaway RSA key generated for
//! these tests only.

use drive_text_extract::config::GoogleConfig;
use drive_text_extract::google::{
    Authenticator, DocsClient, DocumentId, DocumentReader, DriveClient, FileId,
    GOOGLE_DOCS_MIME_TYPE, PDF_MIME_TYPE, PipelineError, ServiceAccountAuthenticator,
    StorageClient,
};
use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "ya29.test-token";

fn fixture_key() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/service-account.json")
}

fn google_config(server: &MockServer) -> GoogleConfig {
    GoogleConfig {
        credentials_file: fixture_key(),
        token_uri: Some(format!("{}/token", server.uri())),
        drive_api_base: server.uri(),
        drive_upload_base: server.uri(),
        docs_api_base: server.uri(),
        request_timeout_secs: Some(5),
    }
}

fn drive_client(server: &MockServer) -> DriveClient {
    DriveClient::new(
        reqwest::Client::new(),
        TOKEN.to_string(),
        &server.uri(),
        &server.uri(),
    )
}

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_upload_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "resumable"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_json(json!({ "name": "Uploaded PDF", "mimeType": PDF_MIME_TYPE })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Location", format!("{}/upload/session/abc", server.uri())),
        )
        .mount(server)
        .await;
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_authenticate_and_run_all_steps() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_upload_session(&server).await;

    Mock::given(method("PUT"))
        .and(path("/upload/session/abc"))
        .and(header("content-type", PDF_MIME_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "file-123" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/drive/v3/files/file-123/copy"))
        .and(body_json(json!({ "mimeType": GOOGLE_DOCS_MIME_TYPE })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "doc-456" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/documents/doc-456"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documentId": "doc-456",
            "body": { "content": [
                { "paragraph": { "elements": [ { "textRun": { "content": "Hello " } } ] } },
                { "paragraph": { "elements": [ { "textRun": { "content": "World" } } ] } }
            ]}
        })))
        .mount(&server)
        .await;

    let authenticator = ServiceAccountAuthenticator::new(google_config(&server)).unwrap();
    let clients = authenticator.authenticate().await.expect("authentication");

    let file_id = clients
        .storage
        .upload(b"%PDF-1.4 test".to_vec(), PDF_MIME_TYPE)
        .await
        .unwrap();
    assert_eq!(file_id, FileId("file-123".to_string()));

    let doc_id = clients
        .storage
        .convert(&file_id, GOOGLE_DOCS_MIME_TYPE)
        .await
        .unwrap();
    assert_eq!(doc_id, DocumentId("doc-456".to_string()));

    let document = clients.documents.fetch_content(&doc_id).await.unwrap();
    assert_eq!(document.plain_text(), "Hello World");
}

#[tokio::test]
async fn test_rejected_service_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;

    let authenticator = ServiceAccountAuthenticator::new(google_config(&server)).unwrap();
    let err = authenticator.authenticate().await.unwrap_err();

    assert!(matches!(err, PipelineError::Authentication(_)));
    assert!(err.to_string().contains("invalid_grant"));
}

#[tokio::test]
async fn test_token_response_without_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token_type": "Bearer" })))
        .mount(&server)
        .await;

    let authenticator = ServiceAccountAuthenticator::new(google_config(&server)).unwrap();
    let err = authenticator.authenticate().await.unwrap_err();
    assert!(err.to_string().contains("access_token"));
}

#[tokio::test]
async fn test_missing_credentials_file() {
    let server = MockServer::start().await;
    let mut config = google_config(&server);
    config.credentials_file = PathBuf::from("/nonexistent/service-account.json");

    let authenticator = ServiceAccountAuthenticator::new(config).unwrap();
    let err = authenticator.authenticate().await.unwrap_err();

    assert!(matches!(err, PipelineError::Authentication(_)));
    // No token request is attempted without a key.
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Drive
// =============================================================================

#[tokio::test]
async fn test_upload_without_id() {
    let server = MockServer::start().await;
    mount_upload_session(&server).await;
    Mock::given(method("PUT"))
        .and(path("/upload/session/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = drive_client(&server)
        .upload(b"%PDF".to_vec(), PDF_MIME_TYPE)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Upload(_)));
    assert!(
        err.to_string()
            .contains("Failed to upload the PDF to Google Drive.")
    );
}

#[tokio::test]
async fn test_upload_session_without_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = drive_client(&server)
        .upload(b"%PDF".to_vec(), PDF_MIME_TYPE)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Upload(_)));
}

#[tokio::test]
async fn test_upload_server_error() {
    let server = MockServer::start().await;
    mount_upload_session(&server).await;
    Mock::given(method("PUT"))
        .and(path("/upload/session/abc"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let err = drive_client(&server)
        .upload(b"%PDF".to_vec(), PDF_MIME_TYPE)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("backend unavailable"));
}

#[tokio::test]
async fn test_convert_without_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/drive/v3/files/file-1/copy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "" })))
        .mount(&server)
        .await;

    let err = drive_client(&server)
        .convert(&FileId("file-1".to_string()), GOOGLE_DOCS_MIME_TYPE)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Conversion(_)));
    assert!(
        err.to_string()
            .contains("Failed to convert the PDF to Google Docs format.")
    );
}

// =============================================================================
// Docs
// =============================================================================

#[tokio::test]
async fn test_fetch_unknown_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/documents/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Requested entity was not found." }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docs = DocsClient::new(reqwest::Client::new(), TOKEN.to_string(), &server.uri());
    let err = docs
        .fetch_content(&DocumentId("missing".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Fetch(_)));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_fetch_empty_identifier_skips_request() {
    let server = MockServer::start().await;
    let docs = DocsClient::new(reqwest::Client::new(), TOKEN.to_string(), &server.uri());

    let err = docs
        .fetch_content(&DocumentId(String::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Fetch(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

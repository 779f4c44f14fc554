//! Google Document AI OCR extraction.
//!
//! Sends the whole PDF inline to a Document AI processor and returns the
//! recognised text. Each call is billed, so the hybrid parser only reaches
//! for it when the local text layer is unusable.

use async_trait::async_trait;
use autoland_core::{AutolandConfig, DocumentAiConfig, ExtractionMethod, RawExtraction};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::TextExtractor;

const PDF_MIME_TYPE: &str = "application/pdf";
const DEFAULT_LOCATION: &str = "us";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest {
    raw_document: RawDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    content: String,
    mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProcessResponse {
    document: Option<ProcessedDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProcessedDocument {
    text: String,
    pages: Vec<serde_json::Value>,
}

/// Location segment of `projects/{p}/locations/{l}/processors/{id}`.
///
/// Falls back to `us` when the name carries no location.
pub fn processor_location(processor_name: &str) -> &str {
    let mut segments = processor_name.split('/');
    while let Some(segment) = segments.next() {
        if segment == "locations" {
            return segments
                .next()
                .filter(|location| !location.is_empty())
                .unwrap_or(DEFAULT_LOCATION);
        }
    }
    DEFAULT_LOCATION
}

/// Document AI OCR extractor.
pub struct DocumentAiExtractor {
    client: Client,
    processor_name: Option<String>,
    access_token: Option<SecretString>,
    endpoint: Option<String>,
}

impl DocumentAiExtractor {
    /// Create an extractor from the `[document_ai]` configuration section.
    ///
    /// Missing settings are only reported when a document is processed, so
    /// a pipeline can be built even where OCR is not set up.
    pub fn new(config: &DocumentAiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create an extractor from the environment overrides understood by
    /// [`AutolandConfig::from_env`].
    pub fn from_env() -> ExtractResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create an extractor from an arbitrary environment-style lookup.
    pub fn from_lookup<F>(lookup: F) -> ExtractResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = AutolandConfig::from_lookup(lookup)
            .map_err(|e| ExtractError::Configuration(e.to_string()))?;
        Ok(Self::new(&config.document_ai))
    }

    /// Create an extractor with a caller-supplied HTTP client.
    pub fn with_client(client: Client, config: &DocumentAiConfig) -> Self {
        Self {
            client,
            processor_name: config
                .processor_name
                .clone()
                .filter(|name| !name.trim().is_empty()),
            access_token: config
                .access_token
                .clone()
                .filter(|token| !token.trim().is_empty())
                .map(SecretString::new),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Whether both processor and credentials are present.
    pub fn is_configured(&self) -> bool {
        self.processor_name.is_some() && self.access_token.is_some()
    }

    fn processor_name(&self) -> ExtractResult<&str> {
        self.processor_name.as_deref().ok_or_else(|| {
            ExtractError::Configuration(
                "Document AI processor required. Set DOCUMENT_AI_PROCESSOR_ID or provide document_ai.processor_name."
                    .to_string(),
            )
        })
    }

    fn access_token(&self) -> ExtractResult<&SecretString> {
        self.access_token.as_ref().ok_or_else(|| {
            ExtractError::Configuration(
                "Document AI credentials required. Set GOOGLE_OAUTH_ACCESS_TOKEN or provide document_ai.access_token."
                    .to_string(),
            )
        })
    }

    /// Full `:process` URL for the configured processor.
    pub fn process_url(&self) -> ExtractResult<String> {
        let processor = self.processor_name()?;
        let base = match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}-documentai.googleapis.com",
                processor_location(processor)
            ),
        };
        Ok(format!("{}/v1/{}:process", base, processor))
    }
}

fn build_request(content: &[u8]) -> ProcessRequest {
    ProcessRequest {
        raw_document: RawDocument {
            content: STANDARD.encode(content),
            mime_type: PDF_MIME_TYPE,
        },
    }
}

fn into_extraction(response: ProcessResponse) -> ExtractResult<RawExtraction> {
    let document = response.document.unwrap_or_default();
    if document.text.trim().is_empty() {
        return Err(ExtractError::Service(
            "Document AI returned empty text".to_string(),
        ));
    }
    let page_count = document.pages.len();
    Ok(RawExtraction::ok(document.text, page_count))
}

#[async_trait]
impl TextExtractor for DocumentAiExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<RawExtraction> {
        if content.is_empty() {
            return Err(ExtractError::InvalidInput("PDF buffer is empty".to_string()));
        }

        let url = self.process_url()?;
        let token = self.access_token()?;

        debug!(bytes = content.len(), url = %url, "Sending document to Document AI");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(&build_request(content))
            .send()
            .await
            .map_err(|e| ExtractError::Service(format!("Failed to call Document AI: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            warn!(status = %status, "Document AI request rejected");
            return Err(ExtractError::Service(format!(
                "Document AI API error ({}): {}",
                status, error
            )));
        }

        let body: ProcessResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Service(format!("Failed to parse response: {}", e)))?;

        let extraction = into_extraction(body)?;
        debug!(
            pages = extraction.page_count,
            chars = extraction.trimmed_len(),
            "Document AI extraction finished"
        );
        Ok(extraction)
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::CloudOcr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const PROCESSOR: &str = "projects/autoland/locations/eu/processors/abc123";

    fn configured() -> DocumentAiExtractor {
        DocumentAiExtractor::new(&DocumentAiConfig {
            processor_name: Some(PROCESSOR.to_string()),
            access_token: Some("token".to_string()),
            endpoint: None,
        })
    }

    /// Answer one request on a local port with a canned response.
    ///
    /// Returns the endpoint and a handle resolving to the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (endpoint, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    fn against(endpoint: String) -> DocumentAiExtractor {
        let client = Client::builder().no_proxy().build().unwrap();
        DocumentAiExtractor::with_client(
            client,
            &DocumentAiConfig {
                processor_name: Some(PROCESSOR.to_string()),
                access_token: Some("token".to_string()),
                endpoint: Some(endpoint),
            },
        )
    }

    #[tokio::test]
    async fn test_extract_posts_document_with_bearer_token() {
        let (endpoint, request) = serve_once(
            "200 OK",
            r#"{"document": {"text": "AUTOLAND REPORT\nVN-A525", "pages": [{}]}}"#,
        )
        .await;

        let raw = against(endpoint).extract(b"%PDF").await.unwrap();
        assert_eq!(raw.text, "AUTOLAND REPORT\nVN-A525");
        assert_eq!(raw.page_count, 1);

        let request = request.await.unwrap();
        assert!(request.starts_with(
            "POST /v1/projects/autoland/locations/eu/processors/abc123:process HTTP/1.1"
        ));
        assert!(request.to_lowercase().contains("authorization: bearer token"));
        assert!(request.contains(r#""content":"JVBERg==""#));
    }

    #[tokio::test]
    async fn test_rejected_request_is_service_error() {
        let (endpoint, _request) =
            serve_once("403 Forbidden", r#"{"error": {"message": "permission denied"}}"#).await;

        let err = against(endpoint).extract(b"%PDF").await.unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ExtractError::Service(_)));
        assert!(message.contains("403"), "message: {}", message);
        assert!(message.contains("permission denied"), "message: {}", message);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_service_error() {
        let (endpoint, _request) = serve_once("200 OK", "<html>maintenance</html>").await;

        let err = against(endpoint).extract(b"%PDF").await.unwrap_err();
        assert!(matches!(err, ExtractError::Service(_)));
        assert!(err.to_string().contains("Failed to parse response"));
    }

    #[test]
    fn test_from_lookup_reads_config_keys() {
        let extractor = DocumentAiExtractor::from_lookup(|key| match key {
            "DOCUMENT_AI_PROCESSOR_ID" => Some(PROCESSOR.to_string()),
            "GOOGLE_OAUTH_ACCESS_TOKEN" => Some("token".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(extractor.is_configured());

        let bad = DocumentAiExtractor::from_lookup(|key| {
            (key == "AUTOLAND_MIN_TEXT_LENGTH").then(|| "many".to_string())
        });
        assert!(matches!(bad, Err(ExtractError::Configuration(_))));
    }

    #[test]
    fn test_processor_location() {
        assert_eq!(processor_location(PROCESSOR), "eu");
        assert_eq!(processor_location("projects/p/processors/x"), "us");
        assert_eq!(processor_location("projects/p/locations//processors/x"), "us");
    }

    #[test]
    fn test_process_url_defaults_to_regional_endpoint() {
        assert_eq!(
            configured().process_url().unwrap(),
            "https://eu-documentai.googleapis.com/v1/projects/autoland/locations/eu/processors/abc123:process"
        );
    }

    #[test]
    fn test_process_url_with_endpoint_override() {
        let extractor = DocumentAiExtractor::new(&DocumentAiConfig {
            processor_name: Some(PROCESSOR.to_string()),
            access_token: None,
            endpoint: Some("http://localhost:8080/".to_string()),
        });
        assert_eq!(
            extractor.process_url().unwrap(),
            "http://localhost:8080/v1/projects/autoland/locations/eu/processors/abc123:process"
        );
        assert!(!extractor.is_configured());
    }

    #[tokio::test]
    async fn test_missing_processor_is_configuration_error() {
        let extractor = DocumentAiExtractor::new(&DocumentAiConfig::default());
        let result = extractor.extract(b"%PDF-1.4").await;
        assert!(matches!(result, Err(ExtractError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_missing_token_is_configuration_error() {
        let extractor = DocumentAiExtractor::new(&DocumentAiConfig {
            processor_name: Some(PROCESSOR.to_string()),
            access_token: Some("  ".to_string()),
            endpoint: None,
        });
        let result = extractor.extract(b"%PDF-1.4").await;
        assert!(matches!(result, Err(ExtractError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let result = configured().extract(&[]).await;
        assert!(matches!(result, Err(ExtractError::InvalidInput(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(build_request(b"%PDF")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "rawDocument": { "content": "JVBERg==", "mimeType": "application/pdf" }
            })
        );
    }

    #[test]
    fn test_response_conversion() {
        let response: ProcessResponse = serde_json::from_str(
            r#"{"document": {"text": "AUTOLAND REPORT", "pages": [{}, {}], "uri": ""}}"#,
        )
        .unwrap();
        let raw = into_extraction(response).unwrap();
        assert!(raw.success);
        assert_eq!(raw.text, "AUTOLAND REPORT");
        assert_eq!(raw.page_count, 2);
    }

    #[test]
    fn test_empty_text_is_service_error() {
        let response: ProcessResponse = serde_json::from_str(r#"{"document": {"text": ""}}"#).unwrap();
        let err = into_extraction(response).unwrap_err();
        assert_eq!(err.to_string(), "Service error: Document AI returned empty text");

        let missing: ProcessResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(into_extraction(missing), Err(ExtractError::Service(_))));
    }
}

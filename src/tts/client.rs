//! ElevenLabs text-to-speech client.

use super::types::{ApiErrorBody, SpeechRequest};
use crate::transport::TransportError;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

const XI_API_KEY_HEADER: &str = "xi-api-key";
const APPLICATION_JSON: &str = "application/json";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Turns text into audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<Bytes>;
}

#[async_trait]
impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Arc<T> {
    async fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<Bytes> {
        (**self).synthesize(request).await
    }
}

/// Client for `POST /v1/text-to-speech/{voice_id}`.
///
/// Credentials travel with each [`SpeechRequest`], so one client serves any
/// number of settings snapshots.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ElevenLabsClient {
    pub fn builder() -> ElevenLabsClientBuilder {
        ElevenLabsClientBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint for a voice. The voice id is a single path segment, so
    /// separators inside it are percent-encoded rather than followed.
    pub fn endpoint(&self, voice_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::configuration_with_context(
                    "Base URL cannot carry a path",
                    ErrorContext::new().with_details(self.base_url.to_string()),
                )
            })?
            .pop_if_empty()
            .extend(["v1", "text-to-speech", voice_id]);
        Ok(url)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<Bytes> {
        let endpoint = self.endpoint(request.voice_id)?;
        tracing::debug!(
            voice_id = request.voice_id,
            text_len = request.text.len(),
            "sending text-to-speech request"
        );

        let response = self
            .http_client
            .post(endpoint)
            .header(XI_API_KEY_HEADER, request.api_key)
            .header(reqwest::header::CONTENT_TYPE, APPLICATION_JSON)
            .json(&request.body())
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let err = rejection(status.as_u16(), response.bytes().await);
            tracing::warn!(status = status.as_u16(), "text-to-speech request rejected: {}", err);
            return Err(err.into());
        }

        let bytes = response.bytes().await.map_err(TransportError::Http)?;
        tracing::debug!(bytes = bytes.len(), "received synthesized audio");
        Ok(bytes)
    }
}

/// A non-success status stays a status error even when its body is lost.
fn rejection<E: std::fmt::Display>(
    status: u16,
    body: std::result::Result<Bytes, E>,
) -> TransportError {
    let body = match body {
        Ok(bytes) => describe_error_body(&bytes),
        Err(e) => format!("<body unavailable: {}>", e),
    };
    TransportError::Status { status, body }
}

fn describe_error_body(bytes: &[u8]) -> String {
    if let Some(summary) = serde_json::from_slice::<ApiErrorBody>(bytes)
        .ok()
        .and_then(|body| body.summary())
    {
        return summary;
    }
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.chars().count() > MAX_ERROR_BODY_CHARS {
        let truncated: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

pub struct ElevenLabsClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ElevenLabsClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            http_client: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overall request timeout. Unset means reqwest's default (none).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured client; `timeout` is ignored in that case.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<ElevenLabsClient> {
        let raw = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .for_setting("base_url")
                    .with_details(raw.clone()),
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::configuration_with_context(
                "Base URL cannot carry a path",
                ErrorContext::new().for_setting("base_url").with_details(raw),
            ));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| {
                    Error::configuration(format!("Failed to create HTTP client: {}", e))
                })?
            }
        };

        Ok(ElevenLabsClient {
            http_client,
            base_url,
        })
    }
}

impl Default for ElevenLabsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_for_default_base() {
        let client = ElevenLabsClient::builder().build().unwrap();
        assert_eq!(
            client.endpoint("21m00Tcm4TlvDq8ikWAM").unwrap().as_str(),
            "https://api.elevenlabs.io/v1/text-to-speech/21m00Tcm4TlvDq8ikWAM"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_voice() {
        let client = ElevenLabsClient::builder()
            .base_url("http://localhost:4010/proxy/")
            .build()
            .unwrap();
        assert_eq!(
            client.endpoint("../admin").unwrap().as_str(),
            "http://localhost:4010/proxy/v1/text-to-speech/..%2Fadmin"
        );
    }

    #[test]
    fn test_invalid_base_url_is_configuration_error() {
        let err = ElevenLabsClient::builder()
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);

        let err = ElevenLabsClient::builder()
            .base_url("mailto:someone@example.com")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_rejection_keeps_status_when_body_read_fails() {
        let err = rejection::<&str>(503, Err("connection reset"));
        assert_eq!(err.status(), Some(503));
        match err {
            TransportError::Status { body, .. } => assert!(body.contains("connection reset")),
            other => panic!("expected status error, got {other:?}"),
        }

        let err = rejection::<&str>(401, Ok(Bytes::from_static(b"Unauthorized")));
        assert!(matches!(
            err,
            TransportError::Status { status: 401, ref body } if body == "Unauthorized"
        ));
    }

    #[test]
    fn test_error_body_description() {
        assert_eq!(
            describe_error_body(br#"{"detail":{"status":"voice_not_found","message":"A voice with the voice_id abc was not found."}}"#),
            "voice_not_found: A voice with the voice_id abc was not found."
        );
        assert_eq!(describe_error_body(b"  Bad Gateway \n"), "Bad Gateway");
        let long = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
        assert!(describe_error_body(long.as_bytes()).ends_with("..."));
    }
}

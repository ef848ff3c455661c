//! Mock ElevenLabs server for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use note_speech::ElevenLabsClient;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Client pointed at the mock server
    pub fn client(&self) -> ElevenLabsClient {
        ElevenLabsClient::builder()
            .base_url(&self.base_url)
            .build()
            .expect("mock client")
    }

    /// Successful synthesis for `voice_id` with the given key, returning `audio`
    pub async fn mock_audio(&self, voice_id: &str, api_key: &str, audio: &[u8]) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", format!("/v1/text-to-speech/{}", voice_id).as_str())
            .match_header("xi-api-key", api_key)
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(audio)
            .create_async()
            .await
    }

    /// Successful synthesis that also requires the exact request body text
    pub async fn mock_audio_for_text(&self, voice_id: &str, text: &str, audio: &[u8]) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", format!("/v1/text-to-speech/{}", voice_id).as_str())
            .match_body(Matcher::Json(serde_json::json!({
                "text": text,
                "voice_settings": {
                    "similarity_boost": 0.4,
                    "stability": 0.4,
                    "use_speaker_boost": true
                }
            })))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(audio)
            .create_async()
            .await
    }

    /// Create a mock for an error response
    pub async fn mock_error_response(&self, voice_id: &str, status: usize, error_body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", format!("/v1/text-to-speech/{}", voice_id).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(error_body)
            .create_async()
            .await
    }

    /// A mock that must never be hit
    pub async fn mock_unreachable(&self) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(500)
            .expect(0)
            .create_async()
            .await
    }
}

//! Shared test doubles for the host capabilities.

#![allow(dead_code)]

pub mod mock_server;

use async_trait::async_trait;
use bytes::Bytes;
use note_speech::{BinarySink, Notifier, SpeechRequest, SpeechSynthesizer, TransportError};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Synthesizer that records every request and answers from a script.
pub struct FakeSynthesizer {
    audio: Option<Vec<u8>>,
    delay: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub text: String,
    pub voice_id: String,
    pub api_key: String,
}

impl FakeSynthesizer {
    pub fn returning(audio: &[u8]) -> Self {
        Self {
            audio: Some(audio.to_vec()),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with HTTP 500.
    pub fn failing() -> Self {
        Self {
            audio: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest<'_>) -> note_speech::Result<Bytes> {
        self.requests.lock().unwrap().push(RecordedRequest {
            text: request.text.to_string(),
            voice_id: request.voice_id.to_string(),
            api_key: request.api_key.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.audio {
            Some(audio) => Ok(Bytes::from(audio.clone())),
            None => Err(TransportError::Status {
                status: 500,
                body: "synthesis unavailable".into(),
            }
            .into()),
        }
    }
}

/// Sink that records writes, optionally failing each one.
#[derive(Default)]
pub struct RecordingSink {
    fail_with: Option<io::ErrorKind>,
    writes: Mutex<Vec<(String, Vec<u8>)>>,
    attempts: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(kind: io::ErrorKind) -> Self {
        Self {
            fail_with: Some(kind),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BinarySink for RecordingSink {
    async fn create_binary(&self, path: &str, bytes: &[u8]) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.fail_with {
            return Err(io::Error::new(kind, format!("cannot create {}", path)));
        }
        self.writes
            .lock()
            .unwrap()
            .push((path.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

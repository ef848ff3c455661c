//! Text-to-speech request types.

use serde::{Deserialize, Serialize};

/// Voice-shaping parameters sent with every synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub similarity_boost: f64,
    pub stability: f64,
    pub use_speaker_boost: bool,
}

impl VoiceSettings {
    pub const SIMILARITY_BOOST: f64 = 0.4;
    pub const STABILITY: f64 = 0.4;
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            similarity_boost: Self::SIMILARITY_BOOST,
            stability: Self::STABILITY,
            use_speaker_boost: true,
        }
    }
}

/// One synthesis call: what to say, with which voice, on whose account.
#[derive(Clone, Copy)]
pub struct SpeechRequest<'a> {
    pub text: &'a str,
    pub voice_id: &'a str,
    pub api_key: &'a str,
    pub voice_settings: VoiceSettings,
}

impl<'a> SpeechRequest<'a> {
    pub fn new(text: &'a str, voice_id: &'a str, api_key: &'a str) -> Self {
        Self {
            text,
            voice_id,
            api_key,
            voice_settings: VoiceSettings::default(),
        }
    }

    pub fn with_voice_settings(mut self, voice_settings: VoiceSettings) -> Self {
        self.voice_settings = voice_settings;
        self
    }

    pub(crate) fn body(&self) -> TextToSpeechBody<'a> {
        TextToSpeechBody {
            text: self.text,
            voice_settings: self.voice_settings,
        }
    }
}

impl std::fmt::Debug for SpeechRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechRequest")
            .field("text_len", &self.text.len())
            .field("voice_id", &self.voice_id)
            .field("voice_settings", &self.voice_settings)
            .finish_non_exhaustive()
    }
}

/// JSON body of `POST /v1/text-to-speech/{voice_id}`.
#[derive(Debug, Serialize)]
pub(crate) struct TextToSpeechBody<'a> {
    pub text: &'a str,
    pub voice_settings: VoiceSettings,
}

/// Error payload returned by the service, e.g.
/// `{"detail": {"status": "invalid_api_key", "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub detail: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiErrorDetail {
    Structured {
        #[serde(default)]
        status: Option<String>,
        message: String,
    },
    Plain(String),
    Other(serde_json::Value),
}

impl ApiErrorBody {
    pub fn summary(&self) -> Option<String> {
        match &self.detail {
            ApiErrorDetail::Structured {
                status: Some(status),
                message,
            } => Some(format!("{}: {}", status, message)),
            ApiErrorDetail::Structured { status: None, message } => Some(message.clone()),
            ApiErrorDetail::Plain(message) => Some(message.clone()),
            ApiErrorDetail::Other(_) => None,
        }
    }
}

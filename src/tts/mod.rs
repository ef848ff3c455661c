//! TTS（文字转语音）模块：通过 ElevenLabs API 将笔记正文合成为音频。

mod client;
mod types;

pub use client::{ElevenLabsClient, ElevenLabsClientBuilder, SpeechSynthesizer, DEFAULT_BASE_URL};
pub use types::{SpeechRequest, VoiceSettings};

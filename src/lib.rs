//! # note-speech
//!
//! 将 Markdown 笔记正文通过 ElevenLabs 文字转语音 API 合成为音频，并保存在笔记库中。
//!
//! Turns the body of a markdown note into speech with the ElevenLabs
//! text-to-speech API and stores the audio next to the note.
//!
//! ## Overview
//!
//! The whole conversion is one linear pipeline, [`SpeechExporter::export`]:
//!
//! 1. refuse to continue unless an API key and a voice ID are configured,
//! 2. drop the note's front matter,
//! 3. `POST` the body to `/v1/text-to-speech/{voice_id}`,
//! 4. write the returned audio to `audios/<name>.mp3`.
//!
//! Everything the pipeline needs from its host (settings storage, the open
//! note, file creation, user notices) is a small trait in [`host`] or
//! [`settings`], so the same code runs inside an editor host, from the
//! `note-speech` binary, or against fakes in tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use note_speech::{ElevenLabsClient, Settings, SpeechExporter, VaultStorage};
//!
//! #[tokio::main]
//! async fn main() -> note_speech::Result<()> {
//!     let exporter = SpeechExporter::new(
//!         ElevenLabsClient::builder().build()?,
//!         VaultStorage::new("/path/to/vault"),
//!     );
//!     let settings = Settings::new("your-api-key", "your-voice-id");
//!
//!     let outcome = exporter
//!         .export("---\ntitle: Hello\n---\nHello, world!", "hello", &settings)
//!         .await?;
//!     println!("wrote {}", outcome.path);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`exporter`] | The note-to-speech pipeline |
//! | [`command`] | The "Generate Audio" action with user notices |
//! | [`settings`] | Credentials, merging over defaults, persistence |
//! | [`host`] | Host capabilities: document, binary sink, notifier |
//! | [`tts`] | ElevenLabs client |
//! | [`frontmatter`] | Front-matter stripping |
//! | [`naming`] | Audio file naming and sanitization |

pub mod command;
pub mod exporter;
pub mod frontmatter;
pub mod host;
pub mod naming;
pub mod settings;
pub mod transport;
pub mod tts;

// Re-export main types for convenience
pub use command::generate_audio;
pub use exporter::{ExportOutcome, SpeechExporter};
pub use host::{
    BinarySink, ConsoleNotifier, DocumentSource, LogNotifier, NoDocument, NoteFile, Notifier,
    VaultStorage,
};
pub use settings::{
    EnvOverrideStore, JsonSettingsStore, MemorySettingsStore, SettingKey, Settings, SettingsStore,
};
pub use transport::TransportError;
pub use tts::{ElevenLabsClient, ElevenLabsClientBuilder, SpeechRequest, SpeechSynthesizer};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};

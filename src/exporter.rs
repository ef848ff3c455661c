//! Note-to-speech pipeline.

use crate::frontmatter::strip_front_matter;
use crate::host::BinarySink;
use crate::naming::audio_path;
use crate::settings::Settings;
use crate::tts::{SpeechRequest, SpeechSynthesizer, VoiceSettings};
use crate::{Error, Result};

/// A created audio artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Storage-relative path, e.g. `audios/note.mp3`.
    pub path: String,
    pub bytes_written: usize,
}

/// Converts note text into an audio file.
///
/// The exporter keeps no per-call state: settings arrive with every call and
/// concurrent exports share nothing but the synthesizer and sink handles.
pub struct SpeechExporter<S, B> {
    synthesizer: S,
    sink: B,
    voice_settings: VoiceSettings,
}

impl<S, B> SpeechExporter<S, B>
where
    S: SpeechSynthesizer,
    B: BinarySink,
{
    pub fn new(synthesizer: S, sink: B) -> Self {
        Self {
            synthesizer,
            sink,
            voice_settings: VoiceSettings::default(),
        }
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    pub fn sink(&self) -> &B {
        &self.sink
    }

    /// Strip front matter from `raw_text`, synthesize the body with the
    /// credentials in `settings`, and store the audio as
    /// `audios/<output_name>.mp3`.
    ///
    /// Nothing leaves the process unless both credentials are set. The sink
    /// is called at most once and only after a successful synthesis.
    #[tracing::instrument(name = "export", skip_all, fields(output = %output_name))]
    pub async fn export(
        &self,
        raw_text: &str,
        output_name: &str,
        settings: &Settings,
    ) -> Result<ExportOutcome> {
        settings.ensure_complete()?;

        let text = strip_front_matter(raw_text);
        let path = audio_path(output_name);

        tracing::debug!(text_len = text.len(), path = %path, "synthesis in flight");
        let request = SpeechRequest::new(text, &settings.voice_id, &settings.api_key)
            .with_voice_settings(self.voice_settings);
        let audio = match self.synthesizer.synthesize(&request).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!(error = %e, "synthesis failed");
                return Err(e);
            }
        };

        if let Err(source) = self.sink.create_binary(&path, &audio).await {
            tracing::warn!(error = %source, path = %path, "storing audio failed");
            return Err(Error::storage(path, source));
        }

        tracing::info!(path = %path, bytes = audio.len(), "audio exported");
        Ok(ExportOutcome {
            path,
            bytes_written: audio.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    struct EchoSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for EchoSynthesizer {
        async fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<Bytes> {
            Ok(Bytes::copy_from_slice(request.text.as_bytes()))
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(String, Vec<u8>)>>);

    #[async_trait]
    impl BinarySink for Recorder {
        async fn create_binary(&self, path: &str, bytes: &[u8]) -> std::io::Result<()> {
            self.0.lock().unwrap().push((path.to_string(), bytes.to_vec()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_export_writes_stripped_body() {
        let exporter = SpeechExporter::new(EchoSynthesizer, Recorder::default());
        let outcome = exporter
            .export("---\ntitle: x\n---\nHello", "Inbox/note", &Settings::new("k", "v"))
            .await
            .unwrap();
        assert_eq!(outcome.path, "audios/Inbox_note.mp3");
        assert_eq!(outcome.bytes_written, "\nHello".len());
        let writes = exporter.sink().0.lock().unwrap().clone();
        assert_eq!(writes, vec![("audios/Inbox_note.mp3".to_string(), b"\nHello".to_vec())]);
    }

    #[tokio::test]
    async fn test_blank_body_is_sent_as_is() {
        let exporter = SpeechExporter::new(EchoSynthesizer, Recorder::default());
        let outcome = exporter
            .export("---\ntitle: x\n---\n", "note", &Settings::new("k", "v"))
            .await
            .unwrap();
        assert_eq!(outcome.path, "audios/note.mp3");
        let writes = exporter.sink().0.lock().unwrap().clone();
        assert_eq!(writes, vec![("audios/note.mp3".to_string(), b"\n".to_vec())]);
    }
}

//! The "Generate Audio" action.

use crate::exporter::{ExportOutcome, SpeechExporter};
use crate::host::{BinarySink, DocumentSource, Notifier};
use crate::naming::output_name_from_path;
use crate::settings::SettingsStore;
use crate::tts::SpeechSynthesizer;
use crate::{Error, ErrorContext, ErrorKind, Result};

pub const NO_NOTE_MESSAGE: &str = "Please open a note to generate audio.";
pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "Please configure your ElevenLabs API key and Voice ID in the plugin settings.";

/// Convert the open note to audio and tell the user how it went.
///
/// An empty note counts as no note. Every outcome ends in exactly one notice. Errors are also returned so the
/// caller can set an exit status; none of them poison later invocations.
pub async fn generate_audio<S, B>(
    document: &dyn DocumentSource,
    store: &dyn SettingsStore,
    exporter: &SpeechExporter<S, B>,
    notifier: &dyn Notifier,
) -> Result<ExportOutcome>
where
    S: SpeechSynthesizer,
    B: BinarySink,
{
    let (text, path) = match (document.text(), document.path()) {
        (Some(text), Some(path)) if !text.is_empty() => (text, path),
        _ => {
            notifier.notify(NO_NOTE_MESSAGE);
            return Err(Error::validation_with_context(
                "No note is open",
                ErrorContext::new().at_stage("generate_audio"),
            ));
        }
    };
    let name = document.name().unwrap_or(path);

    let settings = match store.load().await {
        Ok(settings) => settings,
        Err(e) => {
            notifier.notify(&format!("Could not load settings: {}", e));
            return Err(e);
        }
    };

    match exporter
        .export(text, &output_name_from_path(path), &settings)
        .await
    {
        Ok(outcome) => {
            notifier.notify(&format!("Audio generated for note '{}'!", name));
            Ok(outcome)
        }
        Err(e) => {
            let message = match e.kind() {
                ErrorKind::Configuration => MISSING_CREDENTIALS_MESSAGE.to_string(),
                _ => format!("Audio generation failed for '{}': {}", name, e),
            };
            notifier.notify(&message);
            Err(e)
        }
    }
}

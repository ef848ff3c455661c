//! Audio artifact naming.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Directory, relative to the storage root, that receives generated audio.
pub const AUDIO_DIR: &str = "audios";
pub const AUDIO_EXTENSION: &str = "mp3";

const MAX_NAME_CHARS: usize = 120;
const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}._ \-]").expect("static regex"));

/// Reduce an output name to a single safe file-name component.
///
/// Path separators flatten to `_`, so `journal/today` never leaves
/// [`AUDIO_DIR`]. Leading dots are dropped. A name with nothing usable left
/// becomes `note-<digest>` so distinct inputs still map to distinct files.
pub fn sanitize_output_name(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name, "_");
    let trimmed = replaced
        .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    let cleaned: String = trimmed.chars().take(MAX_NAME_CHARS).collect();
    let cleaned = cleaned.trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    if cleaned.chars().all(|c| c == '_') {
        let digest = format!("{:x}", Sha256::digest(name.as_bytes()));
        return format!("note-{}", &digest[..16]);
    }
    cleaned.to_string()
}

/// Output name for a note at `path` (relative to the vault): the markdown
/// extension is dropped and the rest sanitized.
pub fn output_name_from_path(path: &str) -> String {
    let lower = path.to_ascii_lowercase();
    let stem = MARKDOWN_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext) && path.len() > ext.len())
        .map(|ext| &path[..path.len() - ext.len()])
        .unwrap_or(path);
    sanitize_output_name(stem)
}

/// Storage path of the audio for `output_name`, e.g. `audios/note.mp3`.
pub fn audio_path(output_name: &str) -> String {
    format!(
        "{}/{}.{}",
        AUDIO_DIR,
        sanitize_output_name(output_name),
        AUDIO_EXTENSION
    )
}

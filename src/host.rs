//! Host capabilities the pipeline depends on.
//!
//! Each capability is a narrow trait so the exporter runs the same way inside
//! an editor host, from the command line, or against fakes in tests.

use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// The note being converted.
pub trait DocumentSource: Send + Sync {
    /// Full text of the note, `None` when no note is open.
    fn text(&self) -> Option<&str>;

    /// Vault-relative path of the note, `None` when no note is open.
    fn path(&self) -> Option<&str>;

    /// Display name: the last component of [`DocumentSource::path`].
    fn name(&self) -> Option<&str> {
        self.path()
            .map(|p| p.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(p))
    }
}

/// Receives the synthesized audio.
#[async_trait]
pub trait BinarySink: Send + Sync {
    /// Create a new file at the storage-relative `path`.
    async fn create_binary(&self, path: &str, bytes: &[u8]) -> io::Result<()>;
}

#[async_trait]
impl<T: BinarySink + ?Sized> BinarySink for Arc<T> {
    async fn create_binary(&self, path: &str, bytes: &[u8]) -> io::Result<()> {
        (**self).create_binary(path, bytes).await
    }
}

/// Fire-and-forget user messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

/// A markdown note read from disk.
#[derive(Debug, Clone)]
pub struct NoteFile {
    path: String,
    text: String,
}

impl NoteFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read `note` and record its path relative to `vault_root` when it lies
    /// inside the vault.
    pub async fn open(vault_root: &Path, note: &Path) -> io::Result<Self> {
        let text = tokio::fs::read_to_string(note).await?;
        let relative = note
            .strip_prefix(vault_root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(note);
        let path = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Ok(Self { path, text })
    }
}

impl DocumentSource for NoteFile {
    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn path(&self) -> Option<&str> {
        if self.path.is_empty() {
            None
        } else {
            Some(&self.path)
        }
    }
}

/// Stand-in for "no note is open".
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocument;

impl DocumentSource for NoDocument {
    fn text(&self) -> Option<&str> {
        None
    }

    fn path(&self) -> Option<&str> {
        None
    }
}

/// Files under a vault directory. Creation never overwrites: an existing
/// file makes [`BinarySink::create_binary`] fail with `AlreadyExists`.
#[derive(Debug, Clone)]
pub struct VaultStorage {
    root: PathBuf,
}

impl VaultStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a storage-relative path; absolute paths and `..` are refused.
    pub fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("path escapes the vault: {}", path),
                    ))
                }
            }
        }
        if resolved == self.root {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty storage path",
            ));
        }
        Ok(resolved)
    }
}

#[async_trait]
impl BinarySink for VaultStorage {
    async fn create_binary(&self, path: &str, bytes: &[u8]) -> io::Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await?;

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            drop(file);
            // Leave nothing half-written behind.
            let _ = tokio::fs::remove_file(&target).await;
            return Err(e);
        }
        tracing::debug!(path = %target.display(), bytes = bytes.len(), "audio file created");
        Ok(())
    }
}

/// Sends notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(target: "note_speech::notice", "{}", message);
    }
}

/// Prints notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

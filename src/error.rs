use crate::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Where a configuration or validation error came from.
///
/// `setting` names the persisted field(s) at fault, `stage` the step of the
/// export that noticed. Both show up in the error's display text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub setting: Option<String>,
    pub stage: Option<&'static str>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_setting(self, setting: impl Into<String>) -> Self {
        Self {
            setting: Some(setting.into()),
            ..self
        }
    }

    pub fn at_stage(self, stage: &'static str) -> Self {
        Self {
            stage: Some(stage),
            ..self
        }
    }

    pub fn with_details(self, details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..self
        }
    }

    fn is_empty(&self) -> bool {
        self.setting.is_none() && self.stage.is_none() && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let parts = [
            self.setting.as_deref().map(|s| format!("setting: {s}")),
            self.stage.map(|s| format!("stage: {s}")),
            self.details.as_deref().map(|d| format!("details: {d}")),
        ];
        let parts: Vec<String> = parts.into_iter().flatten().collect();
        write!(f, " ({})", parts.join("; "))
    }
}

/// Coarse classification of [`Error`], stable across variant changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials are missing; nothing left the process.
    Configuration,
    /// The input cannot be used: no open note, or an unknown setting name.
    Validation,
    /// The synthesis call failed or returned a non-success status.
    Transport,
    /// The audio bytes could not be written.
    Storage,
    Other,
}

/// Unified error type for note-speech.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{context}")]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Storage error: failed to write {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn storage(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Storage { .. } => ErrorKind::Storage,
            Error::Io(_) | Error::Serialization(_) => ErrorKind::Other,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}

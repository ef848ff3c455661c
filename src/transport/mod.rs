//! Transport-level failures of the synthesis call.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    /// HTTP status code, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

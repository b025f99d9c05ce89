//! User-facing status messages
//!
//! Every outcome the user should see (rejected click, missing draft, publish
//! result, model load failure) is reported as a [`StatusMessage`]. The host
//! decides how to show it; the browser build used a toast.

use std::fmt;

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Neutral information or a prompt
    Info,
    /// Something the user tried did not work
    Error,
}

/// A message for the status line / toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Severity
    pub kind: StatusKind,
    /// Display text
    pub text: String,
}

impl StatusMessage {
    /// Create an informational message
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }

    /// Create an error message
    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, text: text.into() }
    }

    /// Whether this is an error message
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StatusKind::Info => write!(f, "{}", self.text),
            StatusKind::Error => write!(f, "error: {}", self.text),
        }
    }
}

/// Ordered log of status messages, drained by the host each frame
#[derive(Debug, Default)]
pub struct StatusLog {
    pending: Vec<StatusMessage>,
}

impl StatusLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message
    pub fn push(&mut self, message: StatusMessage) {
        match message.kind {
            StatusKind::Info => log::info!("status: {}", message.text),
            StatusKind::Error => log::warn!("status: {}", message.text),
        }
        self.pending.push(message);
    }

    /// Most recent message, if any
    pub fn last(&self) -> Option<&StatusMessage> {
        self.pending.last()
    }

    /// Take all queued messages
    pub fn drain(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.pending)
    }
}

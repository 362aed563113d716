use serde::{Deserialize, Serialize};

/// Lifecycle of a camera capture session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Stopped,
}

/// What the driver should do after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No code yet; schedule another attempt on the next frame.
    Reschedule,
    /// A code was read and the session has ended.
    Decoded(String),
    /// The session was cancelled (or was never running); nothing scheduled.
    Quiesced,
}

/// Which camera the stream should come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    User,
    #[default]
    Environment,
}

/// Constraints passed when requesting a camera stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing_mode: FacingMode,
}

/// A message surfaced to the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notice {
    /// Blocking acknowledgment or error popup.
    Alert(String),
    /// Inline status line under the scanner.
    Status(String),
}

/// Result of a one-shot upload decode.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadOutcome {
    pub payload: Option<String>,
    pub status: String,
}

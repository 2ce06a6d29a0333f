use thiserror::Error;

/// Per-event failures. None of these are fatal: callers log them and move on
/// to the next event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("no handler registered for event kind `{kind}`")]
    MissingHandler { kind: String },
    #[error("recording is closed; `{kind}` event was not recorded")]
    RecordingClosed { kind: String },
}

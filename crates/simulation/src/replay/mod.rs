//! Timed-event recording and replay.
//!
//! Each agent owns a [`Replayer`] that records its [`TimedEvent`]s while the
//! agent is live and plays them back, with the recorded relative timing, on
//! every coordinated cycle afterwards.

pub mod dispatch_log;
pub mod error;
pub mod event;
pub mod handlers;
pub mod replayer;
pub mod snapshot;

pub use dispatch_log::{DispatchLog, DispatchOutcome, DispatchRecord};
pub use error::ReplayError;
pub use event::{EventPayload, TimedEvent};
pub use handlers::{DispatchMode, Handler, HandlerContext, HandlerId, HandlerRegistry};
pub use replayer::{CompletionSink, Dispatch, ReplayPhase, Replayer};
pub use snapshot::RecordingSnapshot;

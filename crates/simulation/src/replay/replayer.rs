//! Per-agent recorder and player.
//!
//! A [`Replayer`] records the live agent's events, dispatching each one as it
//! is recorded so the live agent behaves normally. Once the agent switches to
//! replay the recording is frozen and can be played back any number of times,
//! one playback per coordinated cycle.
//!
//! Playback is an explicit state machine advanced once per tick. Each event has
//! an absolute due time: the cycle start plus `t0 - reference_time` for the
//! first event, then the recorded gap to the previous event for each later one.
//! Due times are built from recorded deltas, never from how late the previous
//! tick actually ran, so tick granularity does not accumulate into drift.

use bevy::prelude::*;
use serde::Serialize;

use super::error::ReplayError;
use super::event::TimedEvent;
use super::handlers::{HandlerContext, HandlerId, HandlerRegistry};
use super::snapshot::RecordingSnapshot;

/// Slack when comparing due times, so float accumulation of the tick step
/// cannot push a dispatch one tick late.
const DUE_EPSILON: f64 = 1e-9;

/// Lifecycle of an agent's recording.
///
/// `Recording → ReplayPending → Replaying → ReplayComplete`, and
/// `ReplayComplete → Replaying` on every later cycle. Recording never resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReplayPhase {
    #[default]
    Recording,
    ReplayPending,
    Replaying,
    ReplayComplete,
}

/// Receives the single "this agent finished its cycle" notification.
pub trait CompletionSink {
    fn notify_completed(&mut self, agent: Entity);
}

/// Result of dispatching one event during playback.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub kind: String,
    pub recorded_at: f64,
    pub result: Result<usize, ReplayError>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PlaybackCursor {
    next: usize,
    next_due: f64,
}

#[derive(Component, Debug)]
pub struct Replayer {
    reference_time: f64,
    events: Vec<TimedEvent>,
    handlers: HandlerRegistry,
    phase: ReplayPhase,
    cursor: Option<PlaybackCursor>,
    cycles_completed: u32,
}

/// Gap to wait before an event; negative gaps dispatch immediately.
fn clamp_delay(delay: f64) -> f64 {
    if delay.is_finite() {
        delay.max(0.0)
    } else {
        0.0
    }
}

impl Replayer {
    pub fn new(reference_time: f64) -> Self {
        Self {
            reference_time,
            events: Vec::new(),
            handlers: HandlerRegistry::default(),
            phase: ReplayPhase::Recording,
            cursor: None,
            cycles_completed: 0,
        }
    }

    pub fn reference_time(&self) -> f64 {
        self.reference_time
    }

    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn is_replaying(&self) -> bool {
        self.phase == ReplayPhase::Replaying
    }

    /// Number of playbacks that ran to completion (or were cancelled).
    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    pub fn register_handler<F>(&mut self, kind: impl Into<String>, handler: F) -> HandlerId
    where
        F: Fn(&mut HandlerContext<'_>, &TimedEvent) + Send + Sync + 'static,
    {
        self.handlers.register(kind, handler)
    }

    pub fn remove_handler(&mut self, kind: &str, id: HandlerId) -> bool {
        self.handlers.remove(kind, id)
    }

    pub fn handler_count(&self, kind: &str) -> usize {
        self.handlers.handler_count(kind)
    }

    // -----------------------------------------------------------------------
    // Recording
    // -----------------------------------------------------------------------

    /// Append `event` to the recording and dispatch it immediately.
    ///
    /// Fails with `RecordingClosed` once the agent has left the recording
    /// phase. A missing handler is reported but the event stays recorded.
    pub fn record_input(
        &mut self,
        event: TimedEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<usize, ReplayError> {
        if self.phase != ReplayPhase::Recording {
            return Err(ReplayError::RecordingClosed {
                kind: event.kind().to_string(),
            });
        }
        debug_assert!(
            self.events
                .last()
                .is_none_or(|last| last.timestamp() <= event.timestamp()),
            "events must be recorded in timestamp order"
        );
        self.events.push(event);
        let recorded = &self.events[self.events.len() - 1];
        self.execute_event(recorded, ctx)
    }

    /// Run the handlers for `event`. A missing handler is logged and returned,
    /// never raised past the caller.
    pub fn execute_event(
        &self,
        event: &TimedEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Result<usize, ReplayError> {
        let result = self.handlers.dispatch(ctx, event);
        if let Err(err) = &result {
            error!("Replayer for {:?}: {} (t={:.3})", ctx.source, err, event.timestamp());
        }
        result
    }

    /// Stop accepting new events. Called on the agent's mode switch.
    pub fn freeze(&mut self) {
        if self.phase == ReplayPhase::Recording {
            self.phase = ReplayPhase::ReplayPending;
        }
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------

    /// Start a playback cycle at clock time `now`.
    ///
    /// Freezes the recording if it is still open. An empty recording finishes
    /// on the spot and reports completion right away.
    pub fn begin_replay(&mut self, agent: Entity, now: f64, sink: &mut impl CompletionSink) {
        self.freeze();
        if self.phase == ReplayPhase::Replaying {
            warn!(
                "Replayer for {:?}: restarting a playback that had not finished",
                agent
            );
        }
        match self.events.first() {
            Some(first) => {
                self.phase = ReplayPhase::Replaying;
                self.cursor = Some(PlaybackCursor {
                    next: 0,
                    next_due: now + clamp_delay(first.timestamp() - self.reference_time),
                });
            }
            None => {
                self.cursor = None;
                self.finish(agent, sink);
            }
        }
    }

    /// Dispatch every event that is due at clock time `now`, in recorded order.
    ///
    /// Reports completion through `sink` on the call that dispatches the last
    /// event. Does nothing unless a playback is in progress.
    pub fn advance(
        &mut self,
        now: f64,
        ctx: &mut HandlerContext<'_>,
        sink: &mut impl CompletionSink,
    ) -> Vec<Dispatch> {
        let Some(mut cursor) = self.cursor else {
            return Vec::new();
        };
        if self.phase != ReplayPhase::Replaying {
            return Vec::new();
        }

        let mut dispatched = Vec::new();
        while cursor.next < self.events.len() && now + DUE_EPSILON >= cursor.next_due {
            let event = &self.events[cursor.next];
            let result = self.execute_event(event, ctx);
            dispatched.push(Dispatch {
                kind: event.kind().to_string(),
                recorded_at: event.timestamp(),
                result,
            });
            cursor.next += 1;
            if let Some(following) = self.events.get(cursor.next) {
                cursor.next_due += clamp_delay(following.timestamp() - event.timestamp());
            }
        }

        if cursor.next >= self.events.len() {
            self.cursor = None;
            self.finish(ctx.source, sink);
        } else {
            self.cursor = Some(cursor);
        }
        dispatched
    }

    /// Abort an in-flight playback. Still counts as completion so the cohort
    /// barrier is released. Returns `false` if nothing was playing.
    pub fn cancel_replay(&mut self, agent: Entity, sink: &mut impl CompletionSink) -> bool {
        if self.phase != ReplayPhase::Replaying {
            return false;
        }
        self.cursor = None;
        self.finish(agent, sink);
        true
    }

    /// Seconds until the next event is due, if a playback is in progress.
    pub fn time_until_next(&self, now: f64) -> Option<f64> {
        self.cursor.map(|cursor| (cursor.next_due - now).max(0.0))
    }

    /// Index of the next event to be replayed.
    pub fn playback_position(&self) -> Option<usize> {
        self.cursor.map(|cursor| cursor.next)
    }

    pub fn snapshot(&self) -> RecordingSnapshot {
        RecordingSnapshot {
            reference_time: self.reference_time,
            phase: self.phase,
            cycles_completed: self.cycles_completed,
            events: self.events.clone(),
        }
    }

    fn finish(&mut self, agent: Entity, sink: &mut impl CompletionSink) {
        self.phase = ReplayPhase::ReplayComplete;
        self.cycles_completed += 1;
        sink.notify_completed(agent);
    }
}

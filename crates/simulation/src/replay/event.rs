//! Timestamped input events.

use bevy::prelude::*;
use serde::Serialize;

use crate::clock::ClockSource;

/// Kind-specific data carried by a [`TimedEvent`].
///
/// A handler asks for the capability it needs (`position()` or `movement()`)
/// and gets `None` when the event does not carry it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum EventPayload {
    #[default]
    None,
    /// A world-space point, e.g. where the cursor was when a button fired.
    Position(Vec2),
    /// Horizontal and vertical axis magnitudes.
    Movement { horizontal: f32, vertical: f32 },
}

impl EventPayload {
    pub fn position(&self) -> Option<Vec2> {
        match self {
            EventPayload::Position(at) => Some(*at),
            _ => None,
        }
    }

    /// Axis magnitudes packed as `(horizontal, vertical)`.
    pub fn movement(&self) -> Option<Vec2> {
        match self {
            EventPayload::Movement {
                horizontal,
                vertical,
            } => Some(Vec2::new(*horizontal, *vertical)),
            _ => None,
        }
    }
}

/// One recorded action and the clock time at which it happened.
///
/// The timestamp is read from the clock when the event is captured and can
/// never be set by the caller. Fields are private so an event cannot change
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    timestamp: f64,
    kind: String,
    payload: EventPayload,
}

impl TimedEvent {
    pub fn capture(
        clock: &impl ClockSource,
        kind: impl Into<String>,
        payload: EventPayload,
    ) -> Self {
        Self {
            timestamp: clock.now(),
            kind: kind.into(),
            payload,
        }
    }

    /// A payload-less event, e.g. a plain button press.
    pub fn button(clock: &impl ClockSource, kind: impl Into<String>) -> Self {
        Self::capture(clock, kind, EventPayload::None)
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }
}

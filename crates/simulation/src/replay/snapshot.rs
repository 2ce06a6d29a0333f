//! Read-only view of one agent's recording, for diagnostics.
//!
//! Snapshots are dumped as JSON for inspection. They are never loaded back;
//! a recording only lives as long as its agent.

use serde::Serialize;

use super::event::TimedEvent;
use super::replayer::ReplayPhase;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingSnapshot {
    pub reference_time: f64,
    pub phase: ReplayPhase,
    pub cycles_completed: u32,
    pub events: Vec<TimedEvent>,
}

impl RecordingSnapshot {
    /// Serialize to pretty JSON for human-readable debugging output.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    /// Seconds from the reference time to the last event (0 when empty).
    pub fn span(&self) -> f64 {
        self.events
            .last()
            .map_or(0.0, |last| (last.timestamp() - self.reference_time).max(0.0))
    }

    /// Check internal consistency:
    /// - every timestamp is finite
    /// - timestamps are non-decreasing in recorded order
    pub fn validate(&self) -> Result<(), String> {
        if let Some(bad) = self.events.iter().position(|e| !e.timestamp().is_finite()) {
            return Err(format!("event {bad} has a non-finite timestamp"));
        }

        for (i, window) in self.events.windows(2).enumerate() {
            if window[1].timestamp() < window[0].timestamp() {
                return Err(format!(
                    "events not in timestamp order: event {} at {} follows {}",
                    i + 1,
                    window[1].timestamp(),
                    window[0].timestamp()
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::*;
    use crate::clock::SimClock;
    use crate::replay::event::EventPayload;

    fn event_at(t: f64, kind: &str) -> TimedEvent {
        TimedEvent::capture(
            &SimClock::starting_at(t),
            kind,
            EventPayload::Position(Vec2::new(1.0, -1.0)),
        )
    }

    fn sample() -> RecordingSnapshot {
        RecordingSnapshot {
            reference_time: 2.0,
            phase: ReplayPhase::ReplayComplete,
            cycles_completed: 1,
            events: vec![
                event_at(2.5, "Fire1"),
                event_at(2.5, "HorzVertAxis"),
                event_at(4.0, "Fire1"),
            ],
        }
    }

    #[test]
    fn validate_accepts_ordered_events() {
        assert!(sample().validate().is_ok());
        assert_eq!(sample().span(), 2.0);
    }

    #[test]
    fn validate_catches_out_of_order_events() {
        let mut snapshot = sample();
        snapshot.events.swap(0, 2);
        let err = snapshot.validate().unwrap_err();
        assert!(err.contains("not in timestamp order"));
    }

    #[test]
    fn json_contains_kinds_and_phase() {
        let json = sample().to_json();
        assert!(json.contains("\"HorzVertAxis\""));
        assert!(json.contains("\"ReplayComplete\""));
        assert!(json.contains("\"reference_time\": 2.0"));
    }

    #[test]
    fn empty_snapshot_has_zero_span() {
        let snapshot = RecordingSnapshot {
            reference_time: 9.0,
            phase: ReplayPhase::Recording,
            cycles_completed: 0,
            events: Vec::new(),
        };
        assert_eq!(snapshot.span(), 0.0);
        assert!(snapshot.validate().is_ok());
    }
}

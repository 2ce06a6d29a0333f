//! Turns the tick's input sample into recorded events on the live agent.

use bevy::prelude::*;

use crate::clock::SimClock;
use crate::effects::EffectQueue;
use crate::input::InputSample;
use crate::replay::{
    DispatchLog, DispatchMode, EventPayload, HandlerContext, ReplayError, Replayer, TimedEvent,
};

use super::components::CloneAgent;
use super::handlers::{FIRE_KIND, MOVE_KIND};

/// Events the live agent should record for one input sample: a fire press
/// with the cursor position, then a movement sample if either axis is nonzero.
pub fn events_for_sample(sample: &InputSample, clock: &SimClock) -> Vec<TimedEvent> {
    let mut events = Vec::with_capacity(2);
    if sample.fire_pressed {
        events.push(TimedEvent::capture(
            clock,
            FIRE_KIND,
            EventPayload::Position(sample.cursor),
        ));
    }
    if sample.has_movement() {
        events.push(TimedEvent::capture(
            clock,
            MOVE_KIND,
            EventPayload::Movement {
                horizontal: sample.horizontal,
                vertical: sample.vertical,
            },
        ));
    }
    events
}

/// Records this tick's input on every live agent (there is normally one).
pub fn record_live_input(
    sample: Res<InputSample>,
    clock: Res<SimClock>,
    mut effects: ResMut<EffectQueue>,
    mut log: ResMut<DispatchLog>,
    mut agents: Query<(Entity, &CloneAgent, &mut Replayer)>,
) {
    let events = events_for_sample(&sample, &clock);
    if events.is_empty() {
        return;
    }

    for (entity, agent, mut replayer) in &mut agents {
        if !agent.is_live() {
            continue;
        }
        let mut ctx = HandlerContext::new(entity, DispatchMode::Live, &mut effects);
        for event in events.iter().cloned() {
            let kind = event.kind().to_string();
            let recorded_at = event.timestamp();
            let result = replayer.record_input(event, &mut ctx);
            if let Err(err) = &result {
                if matches!(err, ReplayError::RecordingClosed { .. }) {
                    warn!("Live agent {:?}: {}", entity, err);
                }
            }
            log.record(entity, DispatchMode::Live, &kind, recorded_at, &result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_sample_records_nothing() {
        let events = events_for_sample(&InputSample::default(), &SimClock::default());
        assert!(events.is_empty());
    }

    #[test]
    fn fire_and_movement_in_one_tick() {
        let sample = InputSample {
            fire_pressed: true,
            cursor: Vec2::new(2.0, 3.0),
            horizontal: 1.0,
            ..Default::default()
        };
        let clock = SimClock::starting_at(1.5);
        let events = events_for_sample(&sample, &clock);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), FIRE_KIND);
        assert_eq!(events[0].payload().position(), Some(Vec2::new(2.0, 3.0)));
        assert_eq!(events[1].kind(), MOVE_KIND);
        assert_eq!(events[1].payload().movement(), Some(Vec2::new(1.0, 0.0)));
        assert!(events.iter().all(|e| e.timestamp() == 1.5));
    }
}

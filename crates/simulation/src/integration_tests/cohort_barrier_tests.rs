//! The cohort barrier: no cycle starts while any agent is still replaying.

use bevy::prelude::*;

use crate::clock::SimClock;
use crate::effects::EffectQueue;
use crate::replay::{
    DispatchMode, DispatchOutcome, HandlerContext, ReplayError, ReplayPhase, Replayer, TimedEvent,
};
use crate::test_harness::TestArena;

/// Three agents where the second still replays long after the first is done.
/// Returns `(first, second, third)` with the clock at about 1.4s.
fn staggered_cohort(arena: &mut TestArena) -> (Entity, Entity, Entity) {
    let first = arena.live_agent().unwrap();
    arena.tick_until(0.2);
    arena.press_fire(Vec2::ZERO);
    arena.tick_until(0.4);
    arena.request_cycle();

    let second = arena.live_agent().unwrap();
    arena.tick_until(0.8);
    assert_eq!(arena.replayer(first).phase(), ReplayPhase::ReplayComplete);
    arena.press_fire(Vec2::ZERO);
    arena.tick_until(1.0);
    arena.request_cycle();

    let third = arena.live_agent().unwrap();
    arena.tick_until(1.4);
    (first, second, third)
}

#[test]
fn cycle_waits_for_every_agent() {
    let mut arena = TestArena::new();
    let (first, second, _third) = staggered_cohort(&mut arena);

    assert_eq!(arena.replayer(first).phase(), ReplayPhase::ReplayComplete);
    assert_eq!(arena.replayer(second).phase(), ReplayPhase::Replaying);
    assert_eq!(arena.coordinator().completed_count(), 2);
    assert!(!arena.coordinator().is_cycle_ready());

    arena.request_cycle();
    assert_eq!(arena.agent_count(), 3, "trigger while replaying must be dropped");
    assert_eq!(arena.coordinator().cycles_started(), 2);

    arena.tick_until(1.9);
    assert_eq!(arena.replayer(second).phase(), ReplayPhase::ReplayComplete);
    assert!(arena.coordinator().is_cycle_ready());

    arena.request_cycle();
    assert_eq!(arena.agent_count(), 4);
    assert_eq!(arena.coordinator().cycles_started(), 3);
}

#[test]
fn rejected_trigger_is_not_queued() {
    let mut arena = TestArena::new();
    let (_first, second, _third) = staggered_cohort(&mut arena);

    arena.request_cycle();
    arena.tick_until(1.9);
    assert_eq!(arena.replayer(second).phase(), ReplayPhase::ReplayComplete);

    // The dropped trigger must not start a cycle on its own later on.
    arena.tick(10);
    assert_eq!(arena.coordinator().cycles_started(), 2);
    assert_eq!(arena.agent_count(), 3);
}

#[test]
fn despawned_agent_releases_the_barrier() {
    let mut arena = TestArena::new();
    let (_first, second, _third) = staggered_cohort(&mut arena);
    assert!(!arena.coordinator().is_cycle_ready());

    arena.despawn_agent(second);
    arena.tick(1);

    assert_eq!(arena.coordinator().agent_count(), 2);
    assert!(arena.coordinator().is_cycle_ready());

    arena.request_cycle();
    assert_eq!(arena.coordinator().cycles_started(), 3);
    assert_eq!(arena.agent_count(), 3);
}

#[test]
fn missing_handler_does_not_stall_the_cohort() {
    let mut arena = TestArena::new();
    let first = arena.live_agent().unwrap();

    arena.tick_until(0.1);
    let clock = *arena.resource::<SimClock>();
    {
        let mut effects = EffectQueue::default();
        let world = arena.world_mut();
        let mut replayer = world.get_mut::<Replayer>(first).unwrap();
        let mut ctx = HandlerContext::new(first, DispatchMode::Live, &mut effects);
        let result = replayer.record_input(TimedEvent::button(&clock, "Jump"), &mut ctx);
        assert!(matches!(result, Err(ReplayError::MissingHandler { .. })));
    }
    arena.tick_until(0.2);
    arena.press_fire(Vec2::ONE);
    arena.tick_until(0.4);
    arena.request_cycle();
    arena.tick_until(0.8);

    assert_eq!(arena.replayer(first).phase(), ReplayPhase::ReplayComplete);
    assert!(arena.coordinator().is_cycle_ready());

    let replayed: Vec<(String, DispatchOutcome)> = arena
        .dispatch_log()
        .for_agent(first)
        .filter(|record| record.mode == DispatchMode::Replay)
        .map(|record| (record.kind.clone(), record.outcome))
        .collect();
    assert_eq!(
        replayed,
        vec![
            ("Jump".to_string(), DispatchOutcome::MissingHandler),
            ("Fire1".to_string(), DispatchOutcome::Handled(1)),
        ]
    );
    assert_eq!(arena.dispatch_log().missing_handler_count(), 1);
}

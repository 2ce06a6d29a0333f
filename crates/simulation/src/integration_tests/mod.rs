//! Integration tests for the clone simulation using the `TestArena` harness.
//!
//! These tests spin up a headless Bevy App with `SimulationPlugin` and verify
//! recording, cycling, and replay across the input, agent, coordinator, and
//! effect systems working together.

mod cohort_barrier_tests;

use crate::replay::ReplayPhase;
use crate::test_harness::TestArena;

// ===========================================================================
// Harness bootstrap tests
// ===========================================================================

#[test]
fn new_arena_has_one_live_agent() {
    let mut arena = TestArena::new();
    assert_eq!(arena.agent_count(), 1);
    assert_eq!(arena.live_agent_count(), 1);
    assert_eq!(arena.coordinator().agent_count(), 1);
    assert!(arena.coordinator().is_cycle_ready());

    let live = arena.live_agent().expect("initial live agent");
    assert_eq!(arena.replayer(live).phase(), ReplayPhase::Recording);
    assert_eq!(arena.replayer(live).reference_time(), 0.0);
}

#[test]
fn arena_without_initial_agent_is_empty() {
    let mut arena = TestArena::without_initial_agent();
    arena.tick(10);
    assert_eq!(arena.agent_count(), 0);
    assert!(arena.coordinator().is_empty());
}

#[test]
fn tick_advances_shared_clock_by_fixed_step() {
    let mut arena = TestArena::new();
    assert_eq!(arena.clock_now(), 0.0);
    arena.tick(50);
    assert_eq!(arena.tick_count(), 50);
    assert!((arena.clock_now() - 1.0).abs() < 1e-9);
}

#[test]
fn cycle_with_nothing_recorded_completes_immediately() {
    let mut arena = TestArena::new();
    let first = arena.live_agent().expect("initial live agent");
    arena.tick(5);
    arena.request_cycle();

    assert_eq!(arena.replayer(first).phase(), ReplayPhase::ReplayComplete);
    assert!(arena.coordinator().is_cycle_ready());
    assert_eq!(arena.agent_count(), 2);
}

//! Cohort coordination: one registry of every agent, the shared replay offset,
//! and the barrier that keeps replay cycles from overlapping.

pub mod cohort;
pub mod systems;

pub use cohort::{CloneCoordinator, CycleStart, OffsetPolicy};
pub use systems::{advance_replays, handle_cycle_requests, unregister_removed_agents};

use bevy::prelude::*;

use crate::agents::record_live_input;
use crate::config::CloneConfig;
use crate::replay::DispatchLog;
use crate::SimulationSet;

/// Registers the coordinator and the cycle/replay systems.
///
/// Within `Simulation`: `record_live_input` → `handle_cycle_requests` →
/// `advance_replays`, so a trigger on the same tick as the last live input
/// still sees that input recorded, and zero-delay events of a fresh cycle
/// fire on the tick the cycle starts.
pub struct CoordinatorPlugin;

impl Plugin for CoordinatorPlugin {
    fn build(&self, app: &mut App) {
        let policy = app
            .world()
            .get_resource::<CloneConfig>()
            .map(|config| config.offset_policy)
            .unwrap_or_default();
        app.insert_resource(CloneCoordinator::new(policy));
        app.init_resource::<DispatchLog>();

        app.add_systems(
            FixedUpdate,
            (
                handle_cycle_requests.after(record_live_input),
                advance_replays.after(handle_cycle_requests),
            )
                .in_set(SimulationSet::Simulation),
        );
        app.add_systems(
            FixedUpdate,
            unregister_removed_agents.in_set(SimulationSet::PostSim),
        );
    }
}

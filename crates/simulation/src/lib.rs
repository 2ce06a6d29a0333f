//! Time-clone simulation core.
//!
//! The live agent's input is recorded as timestamped events. On every cycle
//! trigger each agent is reset to its starting pose and replays its recording
//! with the original relative timing, while a fresh live agent records the next
//! layer. The coordinator keeps the cohort on one timeline and refuses to start
//! a cycle while any agent is still replaying.

use bevy::prelude::*;

pub mod agents;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod effects;
pub mod input;
pub mod replay;
pub mod simulation_sets;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

use clock::{advance_sim_clock, SimClock};
use config::CloneConfig;

/// Global tick counter incremented each FixedUpdate.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Keep a caller-supplied config; plugins below read it while building.
        if !app.world().contains_resource::<CloneConfig>() {
            app.insert_resource(CloneConfig::default());
        }

        app.init_resource::<TickCounter>()
            .init_resource::<SimClock>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::PreSim,
                    SimulationSet::Simulation,
                    SimulationSet::PostSim,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (tick_counter, advance_sim_clock).in_set(SimulationSet::PreSim),
            );

        app.add_plugins((
            input::InputPlugin,
            agents::AgentsPlugin,
            coordinator::CoordinatorPlugin,
            effects::EffectsPlugin,
        ));
    }
}

pub fn tick_counter(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

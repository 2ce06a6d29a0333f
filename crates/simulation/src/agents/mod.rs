//! Clone agents: the live agent the player drives and the replay-only clones
//! it leaves behind after every cycle.

pub mod components;
pub mod handlers;
pub mod recording;
pub mod spawn;

pub use components::{AgentGeneration, AgentRole, CloneAgent, StartingPose};
pub use handlers::{register_default_handlers, DefaultHandlers, FIRE_KIND, MOVE_KIND};
pub use recording::{events_for_sample, record_live_input};
pub use spawn::{spawn_initial_agent, spawn_live_agent, SkipInitialAgent};

use bevy::prelude::*;

use crate::SimulationSet;

/// Spawns the first live agent and records live input every tick.
pub struct AgentsPlugin;

impl Plugin for AgentsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_initial_agent);
        app.add_systems(
            FixedUpdate,
            record_live_input.in_set(SimulationSet::Simulation),
        );
    }
}

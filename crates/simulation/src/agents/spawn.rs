use bevy::prelude::*;

use crate::clock::SimClock;
use crate::config::CloneConfig;
use crate::coordinator::CloneCoordinator;
use crate::replay::Replayer;

use super::components::{AgentGeneration, CloneAgent, StartingPose};
use super::handlers::register_default_handlers;

/// Marker resource that, when present, stops `spawn_initial_agent` from
/// spawning the first live agent. Used by tests that build their own cohort.
#[derive(Resource)]
pub struct SkipInitialAgent;

/// Spawn a live agent at the configured spawn position and register it with
/// the coordinator. The reference time is fixed here, at spawn, according to
/// the coordinator's offset policy.
pub fn spawn_live_agent(
    commands: &mut Commands,
    coordinator: &mut CloneCoordinator,
    config: &CloneConfig,
    now: f64,
) -> Entity {
    let reference_time = coordinator.reference_time_for_spawn(now);
    let mut replayer = Replayer::new(reference_time);
    register_default_handlers(&mut replayer, config);

    let transform = Transform::from_translation(config.spawn_position.extend(0.0));
    let generation = AgentGeneration(coordinator.agent_count() as u32);
    let agent = commands
        .spawn((
            CloneAgent::live(),
            generation,
            StartingPose::of(&transform),
            transform,
            replayer,
        ))
        .id();
    coordinator.add_agent(agent, reference_time);

    info!(
        "Spawned live agent {:?} (generation {}, reference t={:.3}, spawned t={:.3})",
        agent, generation.0, reference_time, now
    );
    agent
}

pub fn spawn_initial_agent(
    mut commands: Commands,
    mut coordinator: ResMut<CloneCoordinator>,
    config: Res<CloneConfig>,
    clock: Res<SimClock>,
    skip: Option<Res<SkipInitialAgent>>,
) {
    if skip.is_some() || !coordinator.is_empty() {
        return;
    }
    spawn_live_agent(&mut commands, &mut coordinator, &config, clock.elapsed());
}

//! Systems that drive replay cycles across the whole cohort.

use bevy::prelude::*;

use crate::agents::{spawn_live_agent, CloneAgent, StartingPose};
use crate::clock::SimClock;
use crate::config::CloneConfig;
use crate::effects::{translate_agent, EffectQueue};
use crate::input::CycleRequest;
use crate::replay::{DispatchLog, DispatchMode, HandlerContext, Replayer};

use super::cohort::CloneCoordinator;

/// Starts a new cycle when a `CycleRequest` arrives and every agent is done.
///
/// Each agent in the cohort is reset to its starting pose and begins replay.
/// The live agent is retired to replay-only first, and exactly one new live
/// agent is spawned for the player. Replay-only agents never spawn agents.
/// Translations queued earlier in the tick are applied before the reset, so
/// they never leak into the replay. At most one cycle starts per tick;
/// triggers that arrive while any agent is still replaying are dropped.
pub fn handle_cycle_requests(
    mut commands: Commands,
    mut requests: EventReader<CycleRequest>,
    mut coordinator: ResMut<CloneCoordinator>,
    config: Res<CloneConfig>,
    clock: Res<SimClock>,
    mut effects: ResMut<EffectQueue>,
    mut agents: Query<(&mut CloneAgent, &mut Replayer, &mut Transform, &StartingPose)>,
) {
    if requests.read().count() == 0 {
        return;
    }

    let Some(cycle) = coordinator.try_begin_cycle() else {
        debug!(
            "Cycle trigger ignored: {}/{} agents finished replaying",
            coordinator.completed_count(),
            coordinator.agent_count()
        );
        return;
    };

    // Movement recorded earlier this tick lands before the pose reset.
    for (agent, delta) in effects.take_translations() {
        if let Ok((_, _, mut transform, _)) = agents.get_mut(agent) {
            translate_agent(&mut transform, delta);
        }
    }

    let now = clock.elapsed();
    let mut owes_live_agent = false;
    for agent in &cycle.agents {
        let Ok((mut clone, mut replayer, mut transform, pose)) = agents.get_mut(*agent) else {
            warn!("Cycle {}: agent {:?} has no replay components", cycle.cycle, agent);
            coordinator.mark_completed(*agent);
            continue;
        };
        pose.apply(&mut transform);
        if clone.retire() {
            owes_live_agent = true;
        }
        replayer.begin_replay(*agent, now, &mut *coordinator);
    }

    info!(
        "Cycle {} started at t={:.3} with {} agents",
        cycle.cycle,
        now,
        cycle.agents.len()
    );

    if owes_live_agent {
        spawn_live_agent(&mut commands, &mut coordinator, &config, now);
    }
}

/// Dispatches every replay event that has come due this tick.
pub fn advance_replays(
    clock: Res<SimClock>,
    mut coordinator: ResMut<CloneCoordinator>,
    mut effects: ResMut<EffectQueue>,
    mut log: ResMut<DispatchLog>,
    mut replayers: Query<(Entity, &mut Replayer)>,
) {
    let now = clock.elapsed();
    for (entity, mut replayer) in &mut replayers {
        if !replayer.is_replaying() {
            continue;
        }
        let mut ctx = HandlerContext::new(entity, DispatchMode::Replay, &mut effects);
        let dispatched = replayer.advance(now, &mut ctx, &mut *coordinator);
        for dispatch in &dispatched {
            log.record(
                entity,
                DispatchMode::Replay,
                &dispatch.kind,
                dispatch.recorded_at,
                &dispatch.result,
            );
        }
        if !replayer.is_replaying() {
            debug!(
                "Agent {:?} finished replay cycle {} at t={:.3}",
                entity,
                replayer.cycles_completed(),
                now
            );
        }
    }
}

/// Unregisters agents whose `Replayer` went away (despawned or stripped), so
/// the cycle barrier never waits on an agent that no longer exists.
pub fn unregister_removed_agents(
    mut removed: RemovedComponents<Replayer>,
    mut coordinator: ResMut<CloneCoordinator>,
) {
    for agent in removed.read() {
        if coordinator.remove_agent(agent) {
            info!("Agent {:?} removed from the cohort", agent);
        }
    }
}

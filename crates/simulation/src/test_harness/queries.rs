use bevy::prelude::*;

use crate::agents::{AgentGeneration, CloneAgent};
use crate::clock::SimClock;
use crate::coordinator::CloneCoordinator;
use crate::effects::FireMarker;
use crate::replay::{DispatchLog, Replayer};
use crate::TickCounter;

use super::TestArena;

impl TestArena {
    // -----------------------------------------------------------------------
    // Simulation control
    // -----------------------------------------------------------------------

    /// Run `n` fixed ticks.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
            std::thread::yield_now();
        }
    }

    /// Tick until the clock reaches `t` (within a rounding step).
    pub fn tick_until(&mut self, t: f64) {
        while self.clock_now() + 1e-9 < t {
            self.tick(1);
        }
    }

    // -----------------------------------------------------------------------
    // World access
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn clock_now(&self) -> f64 {
        self.resource::<SimClock>().elapsed()
    }

    pub fn tick_count(&self) -> u64 {
        self.resource::<TickCounter>().0
    }

    pub fn coordinator(&self) -> &CloneCoordinator {
        self.resource::<CloneCoordinator>()
    }

    pub fn dispatch_log(&self) -> &DispatchLog {
        self.resource::<DispatchLog>()
    }

    // -----------------------------------------------------------------------
    // Agents
    // -----------------------------------------------------------------------

    /// Every agent entity, oldest first.
    pub fn agents(&mut self) -> Vec<Entity> {
        let world = self.app.world_mut();
        let mut agents: Vec<(AgentGeneration, Entity)> = world
            .query::<(Entity, &AgentGeneration)>()
            .iter(world)
            .map(|(entity, generation)| (*generation, entity))
            .collect();
        agents.sort();
        agents.into_iter().map(|(_, entity)| entity).collect()
    }

    pub fn agent_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query::<&CloneAgent>().iter(world).count()
    }

    /// The agent currently taking player input, if any.
    pub fn live_agent(&mut self) -> Option<Entity> {
        let world = self.app.world_mut();
        world
            .query::<(Entity, &CloneAgent)>()
            .iter(world)
            .find(|(_, agent)| agent.is_live())
            .map(|(entity, _)| entity)
    }

    pub fn live_agent_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world
            .query::<&CloneAgent>()
            .iter(world)
            .filter(|agent| agent.is_live())
            .count()
    }

    /// Panics if `agent` has no `Replayer`.
    pub fn replayer(&self, agent: Entity) -> &Replayer {
        self.app
            .world()
            .get::<Replayer>(agent)
            .unwrap_or_else(|| panic!("{agent:?} has no Replayer"))
    }

    pub fn clone_agent(&self, agent: Entity) -> CloneAgent {
        *self
            .app
            .world()
            .get::<CloneAgent>(agent)
            .unwrap_or_else(|| panic!("{agent:?} is not a clone agent"))
    }

    /// Planar position of `agent`.
    pub fn position(&self, agent: Entity) -> Vec2 {
        self.app
            .world()
            .get::<Transform>(agent)
            .map(|transform| transform.translation.truncate())
            .unwrap_or_else(|| panic!("{agent:?} has no Transform"))
    }

    // -----------------------------------------------------------------------
    // Markers
    // -----------------------------------------------------------------------

    pub fn marker_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query::<&FireMarker>().iter(world).count()
    }

    /// Markers dropped by `source`, with their positions.
    pub fn markers_from(&mut self, source: Entity) -> Vec<Vec2> {
        let world = self.app.world_mut();
        world
            .query::<(&FireMarker, &Transform)>()
            .iter(world)
            .filter(|(marker, _)| marker.source == source)
            .map(|(_, transform)| transform.translation.truncate())
            .collect()
    }
}

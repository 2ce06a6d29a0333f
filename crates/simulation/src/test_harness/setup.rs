use bevy::prelude::*;

use crate::agents::spawn_live_agent;
use crate::config::CloneConfig;
use crate::coordinator::CloneCoordinator;
use crate::input::{InputDriver, InputSample, InputSource};

use super::TestArena;

impl TestArena {
    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Install an input source polled every tick. Replaces any earlier one.
    pub fn with_input(mut self, source: impl InputSource + 'static) -> Self {
        self.app.insert_resource(InputDriver::new(source));
        self
    }

    /// Overwrite the current input sample. Persists until changed.
    pub fn set_input(&mut self, sample: InputSample) {
        *self.app.world_mut().resource_mut::<InputSample>() = sample;
    }

    pub fn clear_input(&mut self) {
        self.set_input(InputSample::default());
    }

    /// Run one tick with `sample` as input, then go back to idle.
    pub fn tick_with(&mut self, sample: InputSample) {
        self.set_input(sample);
        self.tick(1);
        self.clear_input();
    }

    /// Press fire for one tick with the cursor at `cursor`.
    pub fn press_fire(&mut self, cursor: Vec2) {
        self.tick_with(InputSample {
            fire_pressed: true,
            cursor,
            ..Default::default()
        });
    }

    /// Hold the movement axes for `ticks` ticks.
    pub fn hold_axes(&mut self, horizontal: f32, vertical: f32, ticks: u32) {
        self.set_input(InputSample {
            horizontal,
            vertical,
            ..Default::default()
        });
        self.tick(ticks);
        self.clear_input();
    }

    /// Press the cycle button for one tick.
    pub fn request_cycle(&mut self) {
        self.tick_with(InputSample {
            cycle_pressed: true,
            ..Default::default()
        });
    }

    // -----------------------------------------------------------------------
    // Cohort
    // -----------------------------------------------------------------------

    /// Spawn a live agent at the current clock time, outside the cycle flow.
    pub fn spawn_agent(&mut self) -> Entity {
        let now = self.clock_now();
        let config = self.resource::<CloneConfig>().clone();
        let world = self.app.world_mut();
        let agent = world.resource_scope(|world, mut coordinator: Mut<CloneCoordinator>| {
            let mut commands = world.commands();
            spawn_live_agent(&mut commands, &mut coordinator, &config, now)
        });
        world.flush();
        agent
    }

    /// Despawn `agent` the way gameplay would, leaving cleanup to the systems.
    pub fn despawn_agent(&mut self, agent: Entity) {
        self.app.world_mut().despawn(agent);
    }
}

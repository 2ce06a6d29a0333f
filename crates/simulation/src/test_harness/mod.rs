//! # TestArena: headless integration test harness for the clone simulation
//!
//! Wraps `bevy::app::App` + `SimulationPlugin` so integration tests and
//! benchmarks can drive the fixed tick by hand, feed input, and inspect agents
//! without a window or renderer.

mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::agents::SkipInitialAgent;
use crate::config::CloneConfig;
use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Feed input with the methods in `setup`, call `tick()` to advance the
/// simulation, then query the resulting ECS state.
pub struct TestArena {
    app: App,
}

impl Default for TestArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TestArena {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Default config, with the first live agent already spawned at t=0.
    pub fn new() -> Self {
        Self::with_config(CloneConfig::default())
    }

    pub fn with_config(config: CloneConfig) -> Self {
        Self::build(config, true)
    }

    /// No agents at all. Tests spawn their own cohort.
    pub fn without_initial_agent() -> Self {
        Self::build(CloneConfig::default(), false)
    }

    fn build(config: CloneConfig, spawn_initial_agent: bool) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Both must be in place before SimulationPlugin builds.
        app.insert_resource(config);
        if !spawn_initial_agent {
            app.insert_resource(SkipInitialAgent);
        }
        app.add_plugins(SimulationPlugin);

        // Run one update so Startup systems execute.
        app.update();

        Self { app }
    }
}

//! Headless demo: a seeded pseudo-player records, triggers cycles, and is
//! joined by a growing crowd of its own clones.
//!
//! There is no window. The app is built from `MinimalPlugins` plus logging,
//! and `FixedUpdate` is driven directly for a fixed number of ticks. Progress
//! is reported through the log; `--dump` writes every agent's recording as
//! JSON when the run ends.

use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use simulation::agents::{AgentGeneration, CloneAgent};
use simulation::config::CloneConfig;
use simulation::coordinator::{CloneCoordinator, OffsetPolicy};
use simulation::input::{InputDriver, RandomWalkInput};
use simulation::replay::{DispatchLog, Replayer};
use simulation::TickCounter;

/// Ticks between progress reports.
const REPORT_EVERY: u64 = 250;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "timeclone")]
#[command(about = "Headless time-clone demo driven by a seeded pseudo-player")]
pub struct DemoOptions {
    /// Fixed ticks to simulate
    #[arg(long, default_value_t = 1_500)]
    pub ticks: u64,

    /// Seed for the pseudo-player's input
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Seconds between cycle presses
    #[arg(long, default_value_t = 3.0, value_parser = parse_positive_seconds)]
    pub cycle_every: f64,

    /// How each agent's reference time is chosen
    #[arg(long, default_value_t = OffsetPolicy::FirstAgent)]
    pub offset_policy: OffsetPolicy,

    /// Write every agent's recording as JSON to this path when the run ends
    #[arg(long)]
    pub dump: Option<PathBuf>,
}

fn parse_positive_seconds(raw: &str) -> Result<f64, String> {
    let seconds: f64 = raw
        .parse()
        .map_err(|_| format!("expected a number of seconds, got '{raw}'"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(format!("must be positive, got {seconds}"))
    }
}

pub fn run_demo(options: &DemoOptions) {
    // -- Build a minimal Bevy App with the simulation, no rendering ----------
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(LogPlugin::default());

    app.insert_resource(CloneConfig {
        offset_policy: options.offset_policy,
        ..Default::default()
    });
    app.insert_resource(InputDriver::new(
        RandomWalkInput::new(options.seed).with_cycle_every(options.cycle_every),
    ));
    app.add_plugins(simulation::SimulationPlugin);

    // Initial update so Startup systems spawn the first live agent.
    app.update();

    info!(
        "timeclone demo: {} ticks, seed {}, cycle every {:.1}s, offset policy {}",
        options.ticks, options.seed, options.cycle_every, options.offset_policy
    );

    // -- Main loop -----------------------------------------------------------
    for _ in 0..options.ticks {
        app.world_mut().run_schedule(FixedUpdate);
        let tick = app.world().resource::<TickCounter>().0;
        if tick % REPORT_EVERY == 0 {
            report(app.world());
        }
    }
    report(app.world());

    if let Some(path) = &options.dump {
        dump_recordings(app.world_mut(), path);
    }
}

fn report(world: &World) {
    let tick = world.resource::<TickCounter>().0;
    let coordinator = world.resource::<CloneCoordinator>();
    let log = world.resource::<DispatchLog>();
    info!(
        "tick {}: {} agents, {} cycles, {}/{} done, {} missing-handler dispatches in log",
        tick,
        coordinator.agent_count(),
        coordinator.cycles_started(),
        coordinator.completed_count(),
        coordinator.agent_count(),
        log.missing_handler_count()
    );
}

fn dump_recordings(world: &mut World, path: &PathBuf) {
    let mut agents: Vec<(AgentGeneration, bool, f64, serde_json::Value)> = world
        .query::<(&AgentGeneration, &CloneAgent, &Replayer)>()
        .iter(world)
        .map(|(generation, agent, replayer)| {
            let snapshot = replayer.snapshot();
            if let Err(problem) = snapshot.validate() {
                warn!("Recording of generation {} is inconsistent: {}", generation.0, problem);
            }
            let recording = serde_json::to_value(&snapshot).unwrap_or_default();
            let span = snapshot.span();
            (*generation, agent.is_live(), span, recording)
        })
        .collect();
    agents.sort_by_key(|(generation, _, _, _)| *generation);

    let entries: Vec<serde_json::Value> = agents
        .into_iter()
        .map(|(generation, live, span, recording)| {
            serde_json::json!({
                "generation": generation.0,
                "live": live,
                "span": span,
                "recording": recording,
            })
        })
        .collect();

    let json = match serde_json::to_string_pretty(&entries) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize recordings: {}", e);
            return;
        }
    };
    match std::fs::write(path, json) {
        Ok(()) => info!("Wrote {} recordings to {}", entries.len(), path.display()),
        Err(e) => error!("Failed to write {}: {}", path.display(), e),
    }
}

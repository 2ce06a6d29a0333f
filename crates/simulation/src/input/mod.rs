//! Already-sampled player input.
//!
//! Device polling lives outside this crate. Whatever reads the device writes an
//! [`InputSample`] each tick, either directly or through an [`InputSource`]
//! installed as the [`InputDriver`].

pub mod random_walk;
pub mod scripted;

pub use random_walk::RandomWalkInput;
pub use scripted::ScriptedInput;

use bevy::prelude::*;

use crate::clock::{ClockSource, SimClock};
use crate::SimulationSet;

/// One tick's worth of input.
///
/// Buttons are edge-triggered: `true` only on the tick the press happened.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    pub fire_pressed: bool,
    pub cycle_pressed: bool,
    /// Cursor position in world space.
    pub cursor: Vec2,
    pub horizontal: f32,
    pub vertical: f32,
}

impl InputSample {
    pub fn has_movement(&self) -> bool {
        self.horizontal != 0.0 || self.vertical != 0.0
    }
}

/// Produces the input sample for the tick at clock time `now`.
pub trait InputSource: Send + Sync {
    fn sample(&mut self, now: f64) -> InputSample;
}

/// The installed input source, polled once per tick in `PreSim`.
#[derive(Resource)]
pub struct InputDriver(Box<dyn InputSource>);

impl InputDriver {
    pub fn new(source: impl InputSource + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// Request to start a new replay cycle. Ignored unless every agent is done.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleRequest;

pub fn poll_input_driver(
    driver: Option<ResMut<InputDriver>>,
    clock: Res<SimClock>,
    mut sample: ResMut<InputSample>,
) {
    if let Some(mut driver) = driver {
        *sample = driver.0.sample(clock.now());
    }
}

pub fn emit_cycle_requests(sample: Res<InputSample>, mut requests: EventWriter<CycleRequest>) {
    if sample.cycle_pressed {
        requests.send(CycleRequest);
    }
}

/// Registers input resources and the per-tick polling systems.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputSample>();
        app.add_event::<CycleRequest>();

        app.add_systems(
            FixedUpdate,
            (poll_input_driver, emit_cycle_requests.after(poll_input_driver))
                .in_set(SimulationSet::PreSim)
                .after(crate::clock::advance_sim_clock),
        );
    }
}

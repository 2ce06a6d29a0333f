//! Shared simulation clock.
//!
//! Every agent reads time from the same [`SimClock`], which advances by a fixed
//! step once per `FixedUpdate` tick. Recorded timestamps and replay due times
//! are both measured against it, so playback does not depend on frame rate.

use bevy::prelude::*;

use crate::config::CloneConfig;

/// Source of the current time in seconds. Never goes backwards.
pub trait ClockSource {
    fn now(&self) -> f64;
}

/// Monotonic seconds since the app started ticking.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    elapsed: f64,
}

impl SimClock {
    /// A clock that has already been running for `elapsed` seconds.
    pub fn starting_at(elapsed: f64) -> Self {
        Self {
            elapsed: elapsed.max(0.0),
        }
    }

    /// Move the clock forward. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl ClockSource for SimClock {
    fn now(&self) -> f64 {
        self.elapsed
    }
}

/// Advances the shared clock by one configured timestep.
pub fn advance_sim_clock(mut clock: ResMut<SimClock>, config: Res<CloneConfig>) {
    clock.advance(config.timestep_secs());
}

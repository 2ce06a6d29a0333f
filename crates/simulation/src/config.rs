use bevy::prelude::*;

use crate::coordinator::OffsetPolicy;

/// Fixed simulation rate. Input is sampled and replays advance once per tick.
pub const DEFAULT_TICK_HZ: f64 = 50.0;
/// World units moved per unit of axis input per movement event.
pub const DEFAULT_MOVE_SCALE: f32 = 0.5;
/// Seconds a fire marker stays alive after it is spawned.
pub const DEFAULT_MARKER_LIFETIME: f64 = 1.0;
/// Number of dispatches retained by the `DispatchLog` ring buffer.
pub const DISPATCH_LOG_CAPACITY: usize = 64;

/// Runtime tunables for the clone mechanic.
///
/// Insert before adding `SimulationPlugin` to override the defaults; the
/// plugin only fills in a default when none is present.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CloneConfig {
    /// Fixed ticks per second.
    pub tick_hz: f64,
    /// Multiplier applied to axis magnitudes when a movement event is handled.
    pub move_scale: f32,
    /// Lifetime of a spawned fire marker, in seconds.
    pub marker_lifetime: f64,
    /// Where every new live agent appears.
    pub spawn_position: Vec2,
    /// How a newly spawned agent's replay reference time is chosen.
    pub offset_policy: OffsetPolicy,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,
            move_scale: DEFAULT_MOVE_SCALE,
            marker_lifetime: DEFAULT_MARKER_LIFETIME,
            spawn_position: Vec2::ZERO,
            offset_policy: OffsetPolicy::default(),
        }
    }
}

impl CloneConfig {
    /// Seconds per fixed tick. Falls back to the default rate for a
    /// non-positive `tick_hz`.
    pub fn timestep_secs(&self) -> f64 {
        if self.tick_hz.is_finite() && self.tick_hz > 0.0 {
            1.0 / self.tick_hz
        } else {
            1.0 / DEFAULT_TICK_HZ
        }
    }
}

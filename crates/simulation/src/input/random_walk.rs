//! Seeded pseudo-player for the headless demo and benchmarks.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{InputSample, InputSource};

/// Wanders with held axis directions, fires now and then, and presses the
/// cycle button on a fixed period. The same seed gives the same input stream.
#[derive(Debug, Clone)]
pub struct RandomWalkInput {
    rng: ChaCha8Rng,
    /// Chance per tick of a fire press.
    pub fire_chance: f64,
    /// Chance per tick of picking a new axis direction.
    pub turn_chance: f64,
    /// Seconds between cycle presses; `None` never presses it.
    pub cycle_every: Option<f64>,
    /// Half-extent of the square the cursor is drawn from.
    pub cursor_range: f32,
    axes: Vec2,
    next_cycle_at: Option<f64>,
}

impl RandomWalkInput {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            fire_chance: 0.02,
            turn_chance: 0.05,
            cycle_every: None,
            cursor_range: 10.0,
            axes: Vec2::ZERO,
            next_cycle_at: None,
        }
    }

    pub fn with_cycle_every(mut self, seconds: f64) -> Self {
        self.cycle_every = (seconds > 0.0).then_some(seconds);
        self.next_cycle_at = self.cycle_every;
        self
    }

    fn random_axis(&mut self) -> f32 {
        // Biased toward standing still so agents do not drift off forever.
        match self.rng.gen_range(0..4) {
            0 => -1.0,
            1 => 1.0,
            _ => 0.0,
        }
    }
}

impl InputSource for RandomWalkInput {
    fn sample(&mut self, now: f64) -> InputSample {
        if self.rng.gen_bool(self.turn_chance.clamp(0.0, 1.0)) {
            self.axes = Vec2::new(self.random_axis(), self.random_axis());
        }

        let fire_pressed = self.rng.gen_bool(self.fire_chance.clamp(0.0, 1.0));
        let range = self.cursor_range.abs().max(f32::EPSILON);
        let cursor = if fire_pressed {
            Vec2::new(self.rng.gen_range(-range..=range), self.rng.gen_range(-range..=range))
        } else {
            Vec2::ZERO
        };

        let mut cycle_pressed = false;
        if let (Some(period), Some(due)) = (self.cycle_every, self.next_cycle_at) {
            if now >= due {
                cycle_pressed = true;
                self.next_cycle_at = Some(due + period);
            }
        }

        InputSample {
            fire_pressed,
            cycle_pressed,
            cursor,
            horizontal: self.axes.x,
            vertical: self.axes.y,
        }
    }
}

//! Deterministic input timeline, for tests and reproducible demos.

use bevy::prelude::*;

use super::{InputSample, InputSource};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    Fire(Vec2),
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisHold {
    from: f64,
    until: f64,
    axes: Vec2,
}

/// Button presses fire once, on the first tick at or after their time. Axis
/// holds apply on every tick in `[from, until)`; later holds win on overlap.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    presses: Vec<(f64, Press)>,
    holds: Vec<AxisHold>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire_at(mut self, at: f64, cursor: Vec2) -> Self {
        self.presses.push((at, Press::Fire(cursor)));
        self
    }

    pub fn cycle_at(mut self, at: f64) -> Self {
        self.presses.push((at, Press::Cycle));
        self
    }

    pub fn hold_axes(mut self, from: f64, until: f64, horizontal: f32, vertical: f32) -> Self {
        self.holds.push(AxisHold {
            from,
            until,
            axes: Vec2::new(horizontal, vertical),
        });
        self
    }

    /// Whether every scripted press has been delivered.
    pub fn is_exhausted(&self) -> bool {
        self.presses.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self, now: f64) -> InputSample {
        let mut sample = InputSample::default();

        let (due, pending): (Vec<_>, Vec<_>) =
            self.presses.drain(..).partition(|(at, _)| *at <= now);
        self.presses = pending;
        for (_, press) in due {
            match press {
                Press::Fire(cursor) => {
                    sample.fire_pressed = true;
                    sample.cursor = cursor;
                }
                Press::Cycle => sample.cycle_pressed = true,
            }
        }

        if let Some(hold) = self
            .holds
            .iter()
            .rev()
            .find(|hold| hold.from <= now && now < hold.until)
        {
            sample.horizontal = hold.axes.x;
            sample.vertical = hold.axes.y;
        }
        sample
    }
}

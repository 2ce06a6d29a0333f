//! Deterministic tick ordering via `SystemSet` phases.
//!
//! Every system in `FixedUpdate` belongs to one of these sets, configured as a
//! chain:
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Tick counter, shared clock, input polling, cycle requests.
//!   Sets up the per-tick state the rest of the tick reads.
//! * **Simulation** – Live recording, cycle triggering, replay dispatch. All
//!   handler invocations happen here; their world effects are only queued.
//! * **PostSim** – Applying queued effects, marker expiry, cohort cleanup.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Individual plugins use `.in_set(SimulationSet::X)` when registering their
/// systems and add `.after()` / `.before()` for ordering inside a phase.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    PreSim,
    Simulation,
    PostSim,
}

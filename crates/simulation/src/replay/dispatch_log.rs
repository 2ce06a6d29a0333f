//! Ring-buffer log of recent event dispatches.
//!
//! The [`DispatchLog`] resource keeps the last [`DISPATCH_LOG_CAPACITY`]
//! dispatches from every agent, live or replaying, so a skipped effect (a
//! missing handler) can be traced after the fact without scraping logs.

use bevy::prelude::*;

use crate::config::DISPATCH_LOG_CAPACITY;

use super::error::ReplayError;
use super::handlers::DispatchMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// This many handlers ran.
    Handled(usize),
    MissingHandler,
}

impl DispatchOutcome {
    /// `None` for errors that mean the event was never dispatched.
    pub fn from_result(result: &Result<usize, ReplayError>) -> Option<Self> {
        match result {
            Ok(count) => Some(DispatchOutcome::Handled(*count)),
            Err(ReplayError::MissingHandler { .. }) => Some(DispatchOutcome::MissingHandler),
            Err(ReplayError::RecordingClosed { .. }) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    pub agent: Entity,
    pub mode: DispatchMode,
    pub kind: String,
    pub recorded_at: f64,
    pub outcome: DispatchOutcome,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DispatchLog {
    entries: Vec<DispatchRecord>,
}

impl DispatchLog {
    /// Record a dispatch. If the buffer is full the oldest entry is evicted.
    pub fn push(&mut self, record: DispatchRecord) {
        if self.entries.len() >= DISPATCH_LOG_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push(record);
    }

    /// Convert a dispatch result into a record and push it. Results that never
    /// reached a handler lookup are skipped.
    pub fn record(
        &mut self,
        agent: Entity,
        mode: DispatchMode,
        kind: &str,
        recorded_at: f64,
        result: &Result<usize, ReplayError>,
    ) {
        if let Some(outcome) = DispatchOutcome::from_result(result) {
            self.push(DispatchRecord {
                agent,
                mode,
                kind: kind.to_string(),
                recorded_at,
                outcome,
            });
        }
    }

    /// Return the last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[DispatchRecord] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn for_agent(&self, agent: Entity) -> impl Iterator<Item = &DispatchRecord> {
        self.entries.iter().filter(move |record| record.agent == agent)
    }

    pub fn missing_handler_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|record| record.outcome == DispatchOutcome::MissingHandler)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Registry of every agent and the barrier between replay cycles.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::replay::CompletionSink;

/// How a newly spawned agent's replay reference time is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OffsetPolicy {
    /// The first agent uses its spawn time; every later agent reuses the first
    /// agent's reference time, so the whole cohort replays on one timeline.
    #[default]
    FirstAgent,
    /// Every agent replays relative to its own spawn time.
    SpawnTime,
    /// Every agent replays relative to clock zero.
    Zero,
}

impl FromStr for OffsetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-agent" => Ok(OffsetPolicy::FirstAgent),
            "spawn-time" => Ok(OffsetPolicy::SpawnTime),
            "zero" => Ok(OffsetPolicy::Zero),
            other => Err(format!(
                "unknown offset policy '{other}' (expected first-agent, spawn-time or zero)"
            )),
        }
    }
}

impl fmt::Display for OffsetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OffsetPolicy::FirstAgent => "first-agent",
            OffsetPolicy::SpawnTime => "spawn-time",
            OffsetPolicy::Zero => "zero",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CohortMember {
    agent: Entity,
    reference_time: f64,
    completed: bool,
}

/// Agents released by an accepted cycle trigger, in spawn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStart {
    /// 1-based index of the cycle.
    pub cycle: u64,
    pub agents: Vec<Entity>,
}

/// Tracks every agent in spawn order and which of them have finished the
/// current replay cycle.
///
/// A newly added agent counts as completed: it has no replay in flight. A new
/// cycle may start only when every agent is completed, and starting one clears
/// every flag in the same call.
#[derive(Resource, Debug, Clone, Default)]
pub struct CloneCoordinator {
    members: Vec<CohortMember>,
    policy: OffsetPolicy,
    cycles_started: u64,
}

impl CloneCoordinator {
    pub fn new(policy: OffsetPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> OffsetPolicy {
        self.policy
    }

    /// Register an agent. It is credited as completed until the next cycle.
    pub fn add_agent(&mut self, agent: Entity, reference_time: f64) {
        if self.members.iter().any(|m| m.agent == agent) {
            warn!("CloneCoordinator: {:?} is already registered", agent);
            return;
        }
        self.members.push(CohortMember {
            agent,
            reference_time,
            completed: true,
        });
    }

    /// Drop an agent (e.g. it was despawned). Returns `false` if unknown.
    pub fn remove_agent(&mut self, agent: Entity) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.agent != agent);
        self.members.len() != before
    }

    /// The first agent's reference time, or `0.0` when there are no agents.
    pub fn offset(&self) -> f64 {
        self.members.first().map_or(0.0, |m| m.reference_time)
    }

    /// Reference time for an agent spawned at clock time `now`.
    pub fn reference_time_for_spawn(&self, now: f64) -> f64 {
        match self.policy {
            OffsetPolicy::FirstAgent if self.members.is_empty() => now,
            OffsetPolicy::FirstAgent => self.offset(),
            OffsetPolicy::SpawnTime => now,
            OffsetPolicy::Zero => 0.0,
        }
    }

    /// Mark `agent` as done with the current cycle. Returns `false` for an
    /// unknown agent or a repeated notification; neither changes the count.
    pub fn mark_completed(&mut self, agent: Entity) -> bool {
        match self.members.iter_mut().find(|m| m.agent == agent) {
            Some(member) if !member.completed => {
                member.completed = true;
                true
            }
            Some(_) => {
                warn!(
                    "CloneCoordinator: {:?} reported completion twice in one cycle",
                    agent
                );
                false
            }
            None => {
                warn!(
                    "CloneCoordinator: completion from unregistered agent {:?}",
                    agent
                );
                false
            }
        }
    }

    pub fn completed_count(&self) -> usize {
        self.members.iter().filter(|m| m.completed).count()
    }

    pub fn agent_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether a cycle trigger would be accepted right now.
    pub fn is_cycle_ready(&self) -> bool {
        self.completed_count() == self.members.len()
    }

    /// Agents in spawn order.
    pub fn agents(&self) -> impl Iterator<Item = Entity> + '_ {
        self.members.iter().map(|m| m.agent)
    }

    /// The most recently added agent, which is the live one.
    pub fn newest_agent(&self) -> Option<Entity> {
        self.members.last().map(|m| m.agent)
    }

    pub fn reference_time_of(&self, agent: Entity) -> Option<f64> {
        self.members
            .iter()
            .find(|m| m.agent == agent)
            .map(|m| m.reference_time)
    }

    pub fn cycles_started(&self) -> u64 {
        self.cycles_started
    }

    /// Accept a cycle trigger if every agent has completed.
    ///
    /// On success every completion flag is cleared and the agents to restart
    /// are returned in spawn order. Otherwise nothing changes and `None` is
    /// returned; the trigger is not queued.
    pub fn try_begin_cycle(&mut self) -> Option<CycleStart> {
        if !self.is_cycle_ready() {
            return None;
        }
        for member in &mut self.members {
            member.completed = false;
        }
        self.cycles_started += 1;
        Some(CycleStart {
            cycle: self.cycles_started,
            agents: self.agents().collect(),
        })
    }
}

impl CompletionSink for CloneCoordinator {
    fn notify_completed(&mut self, agent: Entity) {
        self.mark_completed(agent);
    }
}

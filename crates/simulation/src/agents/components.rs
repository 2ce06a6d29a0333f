use bevy::prelude::*;

/// Whether an agent takes new input or only reproduces its recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    Live,
    Replay,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneAgent {
    pub role: AgentRole,
}

impl CloneAgent {
    pub fn live() -> Self {
        Self {
            role: AgentRole::Live,
        }
    }

    pub fn is_live(&self) -> bool {
        self.role == AgentRole::Live
    }

    /// Switch to replay-only. Returns `true` if the agent was live, meaning
    /// the caller owes the player a new live agent.
    pub fn retire(&mut self) -> bool {
        let was_live = self.is_live();
        self.role = AgentRole::Replay;
        was_live
    }
}

/// Pose the agent is returned to before every replay cycle.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct StartingPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl StartingPose {
    pub fn of(transform: &Transform) -> Self {
        Self {
            translation: transform.translation,
            rotation: transform.rotation,
        }
    }

    pub fn apply(&self, transform: &mut Transform) {
        transform.translation = self.translation;
        transform.rotation = self.rotation;
    }
}

/// Spawn order of an agent, starting at 0 for the first one.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AgentGeneration(pub u32);

//! World effects requested by event handlers.
//!
//! Handlers never touch the ECS directly. They push [`AgentEffect`]s into the
//! [`EffectQueue`], and [`apply_agent_effects`] drains the queue in `PostSim`,
//! after every live recording and replay dispatch of the tick has run.

use bevy::prelude::*;

use crate::agents::CloneAgent;
use crate::clock::SimClock;
use crate::SimulationSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentEffect {
    /// Move `agent` by `delta` in its local frame.
    Translate { agent: Entity, delta: Vec2 },
    /// Drop a short-lived marker at `at` on behalf of `source`.
    SpawnMarker { source: Entity, at: Vec2, lifetime: f64 },
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct EffectQueue {
    pending: Vec<AgentEffect>,
}

impl EffectQueue {
    pub fn push(&mut self, effect: AgentEffect) {
        self.pending.push(effect);
    }

    pub fn drain(&mut self) -> Vec<AgentEffect> {
        self.pending.drain(..).collect()
    }

    /// Removes the queued translations, leaving every other effect in order.
    pub fn take_translations(&mut self) -> Vec<(Entity, Vec2)> {
        let mut moves = Vec::new();
        self.pending.retain(|effect| match *effect {
            AgentEffect::Translate { agent, delta } => {
                moves.push((agent, delta));
                false
            }
            _ => true,
        });
        moves
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentEffect> {
        self.pending.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// A spawned fire marker, despawned once the clock passes `expires_at`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FireMarker {
    pub source: Entity,
    pub expires_at: f64,
}

/// Moves `transform` by `delta` expressed in its local frame.
pub fn translate_agent(transform: &mut Transform, delta: Vec2) {
    let local = transform.rotation * delta.extend(0.0);
    transform.translation += local;
}

/// Drains the effect queue and applies every effect in order.
pub fn apply_agent_effects(
    mut commands: Commands,
    mut queue: ResMut<EffectQueue>,
    clock: Res<SimClock>,
    mut agents: Query<&mut Transform, With<CloneAgent>>,
) {
    for effect in queue.drain() {
        match effect {
            AgentEffect::Translate { agent, delta } => {
                let Ok(mut transform) = agents.get_mut(agent) else {
                    warn!("Translate effect for missing agent {:?}", agent);
                    continue;
                };
                translate_agent(&mut transform, delta);
            }
            AgentEffect::SpawnMarker {
                source,
                at,
                lifetime,
            } => {
                commands.spawn((
                    FireMarker {
                        source,
                        expires_at: clock.elapsed() + lifetime,
                    },
                    Transform::from_translation(at.extend(0.0)),
                ));
            }
        }
    }
}

pub fn expire_fire_markers(
    mut commands: Commands,
    clock: Res<SimClock>,
    markers: Query<(Entity, &FireMarker)>,
) {
    for (entity, marker) in &markers {
        if clock.elapsed() >= marker.expires_at {
            commands.entity(entity).despawn();
        }
    }
}

/// Registers the effect queue and its executor systems.
pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectQueue>();

        app.add_systems(
            FixedUpdate,
            (apply_agent_effects, expire_fire_markers.after(apply_agent_effects))
                .in_set(SimulationSet::PostSim),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_preserves_fifo() {
        let mut queue = EffectQueue::default();
        let agent = Entity::from_raw(3);
        queue.push(AgentEffect::Translate {
            agent,
            delta: Vec2::X,
        });
        queue.push(AgentEffect::SpawnMarker {
            source: agent,
            at: Vec2::new(4.0, 5.0),
            lifetime: 1.0,
        });
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert!(queue.is_empty());
        assert!(matches!(drained[0], AgentEffect::Translate { .. }));
        assert!(matches!(drained[1], AgentEffect::SpawnMarker { .. }));
    }

    #[test]
    fn take_translations_keeps_other_effects_queued() {
        let mut queue = EffectQueue::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        queue.push(AgentEffect::Translate {
            agent: a,
            delta: Vec2::X,
        });
        queue.push(AgentEffect::SpawnMarker {
            source: a,
            at: Vec2::ONE,
            lifetime: 0.5,
        });
        queue.push(AgentEffect::Translate {
            agent: b,
            delta: Vec2::Y,
        });

        let moves = queue.take_translations();
        assert_eq!(moves, vec![(a, Vec2::X), (b, Vec2::Y)]);
        assert_eq!(queue.len(), 1);
        assert!(matches!(
            queue.iter().next(),
            Some(AgentEffect::SpawnMarker { source, .. }) if *source == a
        ));
    }

    #[test]
    fn translate_agent_uses_local_frame() {
        let quarter_turn = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let mut transform = Transform::from_rotation(quarter_turn);
        translate_agent(&mut transform, Vec2::X);
        assert!((transform.translation - Vec3::Y).length() < 1e-5);
    }
}

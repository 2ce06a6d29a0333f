//! The handler set every clone agent starts with.

use bevy::prelude::*;

use crate::config::CloneConfig;
use crate::effects::AgentEffect;
use crate::replay::{HandlerId, Replayer};

/// Button press carrying the cursor position.
pub const FIRE_KIND: &str = "Fire1";
/// Movement sample carrying horizontal/vertical axis magnitudes.
pub const MOVE_KIND: &str = "HorzVertAxis";

pub struct DefaultHandlers {
    pub fire: HandlerId,
    pub movement: HandlerId,
}

/// Fire drops a marker where the cursor was; movement translates the agent by
/// the scaled axis values.
pub fn register_default_handlers(
    replayer: &mut Replayer,
    config: &CloneConfig,
) -> DefaultHandlers {
    let lifetime = config.marker_lifetime;
    let fire = replayer.register_handler(FIRE_KIND, move |ctx, event| {
        let Some(at) = event.payload().position() else {
            warn!("{} event for {:?} has no position", FIRE_KIND, ctx.source);
            return;
        };
        ctx.effects.push(AgentEffect::SpawnMarker {
            source: ctx.source,
            at,
            lifetime,
        });
    });

    let scale = config.move_scale;
    let movement = replayer.register_handler(MOVE_KIND, move |ctx, event| {
        let Some(axes) = event.payload().movement() else {
            warn!("{} event for {:?} has no axis values", MOVE_KIND, ctx.source);
            return;
        };
        ctx.effects.push(AgentEffect::Translate {
            agent: ctx.source,
            delta: axes * scale,
        });
    });

    DefaultHandlers { fire, movement }
}

//! Kind → handler-list registry.
//!
//! Handlers for a kind run in registration order. Registering never replaces
//! an existing handler, and removal is by the [`HandlerId`] returned from
//! registration.

use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use serde::Serialize;

use crate::effects::EffectQueue;

use super::error::ReplayError;
use super::event::TimedEvent;

/// Whether an event is being handled as it is recorded or during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DispatchMode {
    Live,
    Replay,
}

/// What a handler gets besides the event: the agent it acts for and a queue
/// to push world effects into.
pub struct HandlerContext<'a> {
    pub source: Entity,
    pub mode: DispatchMode,
    pub effects: &'a mut EffectQueue,
}

impl<'a> HandlerContext<'a> {
    pub fn new(source: Entity, mode: DispatchMode, effects: &'a mut EffectQueue) -> Self {
        Self {
            source,
            mode,
            effects,
        }
    }
}

pub type Handler = Box<dyn Fn(&mut HandlerContext<'_>, &TimedEvent) + Send + Sync>;

/// Identity of one registered handler, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

#[derive(Default)]
pub struct HandlerRegistry {
    next_id: u64,
    by_kind: HashMap<String, Vec<(HandlerId, Handler)>>,
}

impl HandlerRegistry {
    /// Append `handler` to the list for `kind`, creating the list if needed.
    pub fn register<F>(&mut self, kind: impl Into<String>, handler: F) -> HandlerId
    where
        F: Fn(&mut HandlerContext<'_>, &TimedEvent) + Send + Sync + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.by_kind
            .entry(kind.into())
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if the kind or id was not present.
    pub fn remove(&mut self, kind: &str, id: HandlerId) -> bool {
        let Some(handlers) = self.by_kind.get_mut(kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.by_kind.remove(kind);
        }
        removed
    }

    pub fn handler_count(&self, kind: &str) -> usize {
        self.by_kind.get(kind).map_or(0, Vec::len)
    }

    /// Run every handler registered for `event.kind()`, in order.
    ///
    /// Returns the number of handlers run, or `MissingHandler` when the kind
    /// has none.
    pub fn dispatch(
        &self,
        ctx: &mut HandlerContext<'_>,
        event: &TimedEvent,
    ) -> Result<usize, ReplayError> {
        let handlers = self
            .by_kind
            .get(event.kind())
            .filter(|handlers| !handlers.is_empty())
            .ok_or_else(|| ReplayError::MissingHandler {
                kind: event.kind().to_string(),
            })?;
        for (_, handler) in handlers {
            handler(ctx, event);
        }
        Ok(handlers.len())
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, handlers) in &self.by_kind {
            map.entry(kind, &handlers.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::clock::SimClock;

    fn agent() -> Entity {
        Entity::from_raw(7)
    }

    #[test]
    fn handlers_accumulate_and_run_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HandlerRegistry::default();
        for label in ["first", "second", "third"] {
            let calls = Arc::clone(&calls);
            registry.register("Fire1", move |_, _| calls.lock().unwrap().push(label));
        }

        let mut effects = EffectQueue::default();
        let mut ctx = HandlerContext::new(agent(), DispatchMode::Live, &mut effects);
        let event = TimedEvent::button(&SimClock::default(), "Fire1");

        assert_eq!(registry.dispatch(&mut ctx, &event), Ok(3));
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_kind_is_missing_handler() {
        let registry = HandlerRegistry::default();
        let mut effects = EffectQueue::default();
        let mut ctx = HandlerContext::new(agent(), DispatchMode::Replay, &mut effects);
        let event = TimedEvent::button(&SimClock::default(), "Fire2");

        assert_eq!(
            registry.dispatch(&mut ctx, &event),
            Err(ReplayError::MissingHandler {
                kind: "Fire2".to_string()
            })
        );
    }

    #[test]
    fn remove_by_id_leaves_other_handlers() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HandlerRegistry::default();
        let a = {
            let calls = Arc::clone(&calls);
            registry.register("Fire1", move |_, _| calls.lock().unwrap().push("a"))
        };
        {
            let calls = Arc::clone(&calls);
            registry.register("Fire1", move |_, _| calls.lock().unwrap().push("b"));
        }

        assert!(registry.remove("Fire1", a));
        assert!(!registry.remove("Fire1", a), "second removal is a no-op");
        assert!(!registry.remove("Unknown", a));
        assert_eq!(registry.handler_count("Fire1"), 1);

        let mut effects = EffectQueue::default();
        let mut ctx = HandlerContext::new(agent(), DispatchMode::Live, &mut effects);
        let event = TimedEvent::button(&SimClock::default(), "Fire1");
        assert_eq!(registry.dispatch(&mut ctx, &event), Ok(1));
        assert_eq!(*calls.lock().unwrap(), vec!["b"]);
    }

    #[test]
    fn removing_last_handler_makes_kind_missing() {
        let mut registry = HandlerRegistry::default();
        let id = registry.register("Fire1", |_, _| {});
        registry.remove("Fire1", id);

        let mut effects = EffectQueue::default();
        let mut ctx = HandlerContext::new(agent(), DispatchMode::Live, &mut effects);
        let event = TimedEvent::button(&SimClock::default(), "Fire1");
        assert!(registry.dispatch(&mut ctx, &event).is_err());
    }
}

//=========================================================================
// Listener Container
//=========================================================================
//
// Indexes hooks by (event type, owner key).
//
// Architecture:
//   local:     HashMap<EventTypeId, HashMap<GameObjectId,   Vec<Listener>>>
//   broadcast: HashMap<EventTypeId, HashMap<Option<String>, Vec<Listener>>>
//
// Event type is the outer key: most drained events have no listener at
// all and are rejected by the first lookup.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

//=== Internal Dependencies ===============================================

use super::{Event, EventContext, EventTypeId, Hook, RoutingTarget};
use crate::core::scene::GameObjectId;

//=== Listener ============================================================

/// A registered hook plus the object it is bound to.
pub struct Listener {
    name: String,
    receiver: Option<GameObjectId>,
    hook: Hook,
}

impl Listener {
    /// `receiver` is the game object the hook belongs to, if any. It is
    /// what [`ListenerContainer::remove_gameobject`] matches on inside
    /// broadcast buckets.
    pub fn new(name: impl Into<String>, receiver: Option<GameObjectId>, hook: Hook) -> Self {
        Self {
            name: name.into(),
            receiver,
            hook,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn receiver(&self) -> Option<GameObjectId> {
        self.receiver
    }

    pub(crate) fn call(&mut self, event: &Event, context: &mut EventContext<'_>) {
        (self.hook)(event, context)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.name)
            .field("receiver", &self.receiver)
            .finish_non_exhaustive()
    }
}

//=== ListenerContainer ===================================================

/// Lookup structure for local and broadcast listeners. No scheduling.
#[derive(Default)]
pub struct ListenerContainer {
    local: HashMap<EventTypeId, HashMap<GameObjectId, Vec<Listener>>>,
    broadcast: HashMap<EventTypeId, HashMap<Option<String>, Vec<Listener>>>,
}

impl ListenerContainer {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Appends a local listener for events targeted at `owner`.
    pub fn add_listener(&mut self, kind: EventTypeId, owner: GameObjectId, listener: Listener) {
        self.local
            .entry(kind)
            .or_default()
            .entry(owner)
            .or_default()
            .push(listener);
    }

    /// Appends a broadcast listener. `None` is the global bucket.
    pub fn add_broadcast(&mut self, kind: EventTypeId, scene: Option<&str>, listener: Listener) {
        self.broadcast
            .entry(kind)
            .or_default()
            .entry(scene.map(str::to_owned))
            .or_default()
            .push(listener);
    }

    //--- Lookup -----------------------------------------------------------

    /// Listeners for `event`, in registration order.
    pub fn get_listeners(&mut self, event: &Event) -> Option<&mut Vec<Listener>> {
        let kind = event.kind();
        match event.target() {
            RoutingTarget::Broadcast => self.broadcast.get_mut(&kind)?.get_mut(&None),
            RoutingTarget::Scene(name) => self
                .broadcast
                .get_mut(&kind)?
                .get_mut(&Some(name.clone())),
            RoutingTarget::GameObject(id) => self.local.get_mut(&kind)?.get_mut(id),
        }
    }

    /// Number of listeners that would receive `event`.
    pub fn count_for(&mut self, event: &Event) -> usize {
        self.get_listeners(event).map_or(0, |l| l.len())
    }

    /// Total registered listeners across both buckets.
    pub fn len(&self) -> usize {
        let local: usize = self.local.values().flat_map(|m| m.values()).map(Vec::len).sum();
        let broadcast: usize = self
            .broadcast
            .values()
            .flat_map(|m| m.values())
            .map(Vec::len)
            .sum();
        local + broadcast
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    //--- Removal ----------------------------------------------------------

    /// Drops every listener owned by `gameobject`.
    ///
    /// Local buckets are keyed by the object itself. Broadcast buckets are
    /// keyed by scene, so they are filtered by each listener's receiver.
    pub fn remove_gameobject(&mut self, gameobject: GameObjectId) {
        for by_owner in self.local.values_mut() {
            by_owner.remove(&gameobject);
        }
        for by_scene in self.broadcast.values_mut() {
            for listeners in by_scene.values_mut() {
                listeners.retain(|l| l.receiver != Some(gameobject));
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

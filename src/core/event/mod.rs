//=========================================================================
// Event System
//=========================================================================
//
// Scoped publish/subscribe dispatch driven once per frame.
//
// Architecture:
//   send()/broadcast() ──► native queue  ──► EventSystem::update()
//   send(system=true)  ──► system queue  ──► EventSystem::update_system()
//                                               │
//                         ListenerContainer ◄───┘ (route by target)
//                           ├─ local:     (type, game object) → hooks
//                           └─ broadcast: (type, scene | None) → hooks
//
// Both drains take a snapshot of their queue, so events posted by a hook
// are delivered by the next drain, never the current one.
//
//=========================================================================

//=== Module Declarations =================================================

mod event_system;
mod event_type;
mod listener;
mod listener_container;
mod native_queue;
mod payload;
mod sender;
mod system_queue;

//=== Public API ==========================================================

pub use event_system::EventSystem;
pub use event_type::EventTypeId;
pub use listener::{EventListener, ListenerRegistry, ListenerTable};
pub use listener_container::{Listener, ListenerContainer};
pub use native_queue::NativeEventQueue;
pub use payload::{Payload, Value};
pub use sender::EventSender;
pub use system_queue::SystemEventQueue;

//=== Internal Dependencies ===============================================

use crate::core::scene::{GameObjectId, World};

//=== Scope ===============================================================

/// Audience class of a listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Only events targeted at the owning game object.
    Local,

    /// Events broadcast to the owner's scene.
    BroadcastScene,

    /// Global broadcasts.
    Broadcast,
}

//=== RoutingTarget =======================================================

/// Selects which listener bucket an event is looked up in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutingTarget {
    /// Global broadcast bucket.
    Broadcast,

    /// Scene broadcast bucket, keyed by scene name.
    Scene(String),

    /// Local bucket of a single game object.
    GameObject(GameObjectId),
}

//=== Event ===============================================================

/// Immutable event record, created at send time and dropped after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: EventTypeId,
    payload: Payload,
    target: RoutingTarget,
}

impl Event {
    pub fn new(kind: EventTypeId, payload: Payload, target: RoutingTarget) -> Self {
        Self { kind, payload, target }
    }

    /// Global broadcast with no routing target.
    pub fn broadcast(kind: EventTypeId, payload: Payload) -> Self {
        Self::new(kind, payload, RoutingTarget::Broadcast)
    }

    pub fn kind(&self) -> EventTypeId {
        self.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn target(&self) -> &RoutingTarget {
        &self.target
    }

    /// Shorthand for `payload().get(key)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// The `listener` entry added to targeted events.
    pub fn listener(&self) -> Option<&Value> {
        self.payload.get("listener")
    }

    /// The `collides` entry of collision and trigger events.
    pub fn collides(&self) -> Option<GameObjectId> {
        self.payload.get("collides").and_then(Value::as_gameobject)
    }
}

//=== EventContext ========================================================

/// Mutable view handed to every hook while it runs.
pub struct EventContext<'a> {
    /// The scene graph. Hooks may move or inspect objects.
    pub world: &'a mut World,

    /// Posts follow-up events to the native or system queue.
    pub sender: &'a EventSender,

    destroyed: &'a mut Vec<GameObjectId>,
}

impl EventContext<'_> {
    /// Requests removal of `gameobject` from every subsystem.
    ///
    /// Applied by the frame controller once the current drain finishes,
    /// so the object stays valid for the remaining hooks of this drain.
    pub fn destroy(&mut self, gameobject: GameObjectId) {
        if !self.destroyed.contains(&gameobject) {
            self.destroyed.push(gameobject);
        }
    }
}

/// Listener callable.
pub type Hook = Box<dyn FnMut(&Event, &mut EventContext<'_>)>;

//=== UiLayer =============================================================

/// UI collaborator that gets first look at every drained event.
pub trait UiLayer {
    /// Returns true when the event was consumed and must not be routed.
    fn process_events(&mut self, event: &Event) -> bool;
}

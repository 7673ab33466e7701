//=========================================================================
// Event Sender
//=========================================================================
//
// Cloneable producer handle for both event queues.
//
// Routing:
//   targets = None        → one broadcast event  → native queue
//   targets = [t1, t2..]  → one event per target → native | system queue
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::{Event, EventTypeId, Payload, RoutingTarget, Value};
use crate::core::scene::GameObjectId;

//=== EventSender =========================================================

/// Posts events to the native (gameplay) or system queue.
///
/// Hooks receive one through [`EventContext`](super::EventContext); the
/// platform layer holds another.
#[derive(Clone)]
pub struct EventSender {
    native: Sender<Event>,
    system: Sender<Event>,
}

impl EventSender {
    pub(crate) fn new(native: Sender<Event>, system: Sender<Event>) -> Self {
        Self { native, system }
    }

    //--- Send API ---------------------------------------------------------

    /// Sends `kind` to each target, or broadcasts when `targets` is `None`.
    ///
    /// Each target gets its own event whose payload is `payload` plus
    /// `listener: target`. With `system` set, targeted events go to the
    /// system queue; broadcasts always go to the native queue.
    pub fn send(
        &self,
        kind: EventTypeId,
        targets: Option<&[GameObjectId]>,
        payload: Payload,
        system: bool,
    ) {
        let Some(targets) = targets else {
            self.post(Event::broadcast(kind, payload));
            return;
        };

        for &target in targets {
            let data = payload.merged(Payload::new().with("listener", target));
            let event = Event::new(kind, data, RoutingTarget::GameObject(target));
            self.dispatch(event, system);
        }
    }

    /// Global broadcast (`send` with no targets).
    pub fn broadcast(&self, kind: EventTypeId, payload: Payload) {
        self.send(kind, None, payload, false);
    }

    /// Sends to the scene broadcast bucket keyed by `scene`.
    ///
    /// Does not check that the scene exists; use
    /// [`EventSystem::broadcast_scene`](super::EventSystem::broadcast_scene)
    /// for a checked variant.
    pub fn send_to_scene(&self, kind: EventTypeId, scene: &str, payload: Payload, system: bool) {
        let data = payload.merged(Payload::new().with("listener", Value::Scene(scene.to_owned())));
        let event = Event::new(kind, data, RoutingTarget::Scene(scene.to_owned()));
        self.dispatch(event, system);
    }

    /// Posts a prebuilt event to the native queue.
    ///
    /// Never blocks. A full or disconnected queue drops the event.
    pub fn post(&self, event: Event) {
        trace!(target: "events", "Posting {} to native queue", event.kind());
        match self.native.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(target: "events", "Native queue full, dropping {}", event.kind());
            }
            Err(TrySendError::Disconnected(event)) => {
                warn!(target: "events", "Native queue disconnected, dropping {}", event.kind());
            }
        }
    }

    /// Appends a prebuilt event to the system queue.
    pub fn post_system(&self, event: Event) {
        trace!(target: "events", "Posting {} to system queue", event.kind());
        if let Err(err) = self.system.send(event) {
            warn!(target: "events", "System queue disconnected, dropping {}", err.0.kind());
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn dispatch(&self, event: Event, system: bool) {
        if system {
            self.post_system(event);
        } else {
            self.post(event);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

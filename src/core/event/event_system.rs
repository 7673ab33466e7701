//=========================================================================
// Event System
//=========================================================================
//
// Owns listener registrations and drives dispatch once per frame.
//
// Frame usage:
//   update(dt)         → drain native queue  → route → hooks
//   ... collision passes post events ...
//   update_system(dt)  → drain system queue  → route → hooks
//
// Drain order is FIFO; hooks for one event run in registration order.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{
    Event, EventContext, EventSender, EventTypeId, Listener, ListenerContainer, NativeEventQueue,
    Payload, SystemEventQueue, UiLayer,
};
use crate::core::scene::{GameObjectId, ListenerOwner, World};
use crate::core::TickControl;

//=== EventSystem =========================================================

/// Scoped publish/subscribe dispatcher.
///
/// The single channel through which gameplay code and engine systems
/// talk to each other.
pub struct EventSystem {
    listeners: ListenerContainer,
    native: NativeEventQueue,
    system: SystemEventQueue,
    sender: EventSender,
    ui: Option<Box<dyn UiLayer>>,
    destroyed: Vec<GameObjectId>,
}

impl EventSystem {
    /// Creates an event system whose native queue holds `native_capacity`
    /// pending events.
    pub fn new(native_capacity: usize) -> Self {
        let native = NativeEventQueue::new(native_capacity);
        let system = SystemEventQueue::new();
        let sender = EventSender::new(native.sender(), system.sender());

        Self {
            listeners: ListenerContainer::new(),
            native,
            system,
            sender,
            ui: None,
            destroyed: Vec::new(),
        }
    }

    //--- Collaborators ----------------------------------------------------

    /// Installs the UI layer that may consume events before routing.
    pub fn set_ui_layer(&mut self, ui: Box<dyn UiLayer>) {
        self.ui = Some(ui);
    }

    /// Producer handle for both queues.
    pub fn sender(&self) -> &EventSender {
        &self.sender
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerContainer {
        &mut self.listeners
    }

    pub fn system_queue(&self) -> &SystemEventQueue {
        &self.system
    }

    pub fn native_queue(&self) -> &NativeEventQueue {
        &self.native
    }

    //--- Send API ---------------------------------------------------------

    /// See [`EventSender::send`].
    pub fn send(&self, kind: EventTypeId, targets: Option<&[GameObjectId]>, payload: Payload, system: bool) {
        self.sender.send(kind, targets, payload, system);
    }

    /// Global broadcast to listeners registered without a scene.
    pub fn broadcast(&self, kind: EventTypeId, payload: Payload) {
        self.sender.broadcast(kind, payload);
    }

    /// Sends to listeners registered against `scene_name`.
    ///
    /// An unknown scene is logged and nothing is sent.
    pub fn broadcast_scene(
        &self,
        world: &World,
        kind: EventTypeId,
        scene_name: &str,
        payload: Payload,
        system: bool,
    ) {
        if !world.has_scene(scene_name) {
            warn!(target: "events", "broadcast_scene: unknown scene '{}', {} not sent", scene_name, kind);
            return;
        }
        self.sender.send_to_scene(kind, scene_name, payload, system);
    }

    //--- Registration -----------------------------------------------------

    /// Registers a local hook on `owner`.
    ///
    /// Components are keyed by their owning game object, so a hook
    /// registered on a component receives events sent to its entity.
    pub fn register_event_hook<O, F>(&mut self, kind: EventTypeId, owner: &O, name: &str, hook: F)
    where
        O: ListenerOwner + ?Sized,
        F: FnMut(&Event, &mut EventContext<'_>) + 'static,
    {
        let key = owner.source();
        debug!(target: "events", "Registering event hook [{}] {:?} -> {}", kind, key, name);
        self.listeners
            .add_listener(kind, key, Listener::new(name, Some(key), Box::new(hook)));
    }

    /// Registers a broadcast hook, scene-scoped when `scene` is set.
    ///
    /// `receiver` is the game object the hook is bound to, used to purge it
    /// in [`remove_gameobject`](Self::remove_gameobject).
    pub fn register_broadcast_hook<F>(
        &mut self,
        kind: EventTypeId,
        scene: Option<&str>,
        receiver: Option<GameObjectId>,
        name: &str,
        hook: F,
    ) where
        F: FnMut(&Event, &mut EventContext<'_>) + 'static,
    {
        debug!(target: "events", "Registering broadcast hook [{}] {:?} -> {}", kind, scene, name);
        self.listeners
            .add_broadcast(kind, scene, Listener::new(name, receiver, Box::new(hook)));
    }

    /// Game objects hooks asked to destroy since the last call.
    pub fn take_destroyed(&mut self) -> Vec<GameObjectId> {
        std::mem::take(&mut self.destroyed)
    }

    /// Removes every hook owned by `gameobject`.
    pub fn remove_gameobject(&mut self, gameobject: GameObjectId) {
        debug!(target: "events", "Removing listeners of {:?}", gameobject);
        self.listeners.remove_gameobject(gameobject);
    }

    //--- Dispatch ---------------------------------------------------------

    /// Gameplay drain: dispatches the native queue snapshot.
    pub fn update(&mut self, world: &mut World, _dt: u64) -> TickControl {
        let events = self.native.drain();
        self.dispatch_all(events, world)
    }

    /// System drain: dispatches the system queue snapshot.
    ///
    /// Events a hook enqueues during this call wait for the next one.
    pub fn update_system(&mut self, world: &mut World, _dt: u64) -> TickControl {
        let events = self.system.get_all_and_clear();
        self.dispatch_all(events, world)
    }

    fn dispatch_all(&mut self, events: Vec<Event>, world: &mut World) -> TickControl {
        let mut control = TickControl::Continue;

        for event in events {
            if event.kind() == EventTypeId::QUIT {
                info!(target: "events", "Quit requested");
                control = TickControl::Exit;
            }

            if let Some(ui) = self.ui.as_mut() {
                if ui.process_events(&event) {
                    trace!(target: "events", "{} consumed by UI layer", event.kind());
                    continue;
                }
            }

            let Some(hooks) = self.listeners.get_listeners(&event) else {
                continue;
            };

            trace!(target: "events", "Dispatching {} to {} hook(s)", event.kind(), hooks.len());
            let mut context = EventContext {
                world: &mut *world,
                sender: &self.sender,
                destroyed: &mut self.destroyed,
            };
            for hook in hooks.iter_mut() {
                hook.call(&event, &mut context);
            }
        }

        control
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

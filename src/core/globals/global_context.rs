//=========================================================================
// Global Context
//=========================================================================
//
// Strong owner of every frame-thread subsystem.
//
// Contains:
// - world:      scenes, game objects, transforms
// - events:     listener container and both event queues
// - collisions: colliders, layers and enabled interactions
// - listeners:  per-type listener tables
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::collision::{Collider, ColliderId, CollisionError, CollisionSystem};
use crate::core::event::{EventListener, EventSystem, EventTypeId, ListenerRegistry, Payload};
use crate::core::scene::{GameObjectId, World};

//=== GlobalContext =======================================================

/// Shared state the frame sequence and user code operate on.
///
/// Subsystems hold no references to each other; everything that needs
/// two of them goes through here.
pub struct GlobalContext {
    /// Scenes and game objects.
    pub world: World,

    /// Listener registration and event delivery.
    pub events: EventSystem,

    /// Layered overlap detection.
    pub collisions: CollisionSystem,

    /// Listener tables, built once per listener type.
    pub listeners: ListenerRegistry,
}

impl GlobalContext {
    /// Creates an empty context whose native queue holds `native_capacity`
    /// events.
    pub fn new(native_capacity: usize) -> Self {
        Self {
            world: World::new(),
            events: EventSystem::new(native_capacity),
            collisions: CollisionSystem::new(),
            listeners: ListenerRegistry::new(),
        }
    }

    //--- Construction Helpers ---------------------------------------------

    /// Wraps `value` and binds its tagged listener methods.
    pub fn construct_listener<T: EventListener>(&mut self, value: T) -> Rc<RefCell<T>> {
        self.listeners.construct(value, &mut self.events, &self.world)
    }

    /// Registers `collider` with the collision system.
    pub fn spawn_collider(&mut self, collider: Collider) -> Result<ColliderId, CollisionError> {
        self.collisions.spawn_collider(&self.world, collider)
    }

    /// Sends to the listeners of `scene_name`. Unknown scenes are ignored.
    pub fn broadcast_scene(&self, kind: EventTypeId, scene_name: &str, payload: Payload, system: bool) {
        self.events
            .broadcast_scene(&self.world, kind, scene_name, payload, system);
    }

    //--- Teardown ---------------------------------------------------------

    /// Removes `gameobject` from the event and collision systems, then
    /// despawns it. Returns false if it did not exist.
    ///
    /// Extended systems are not reached from here; use
    /// [`SystemController::destroy_gameobject`](super::SystemController::destroy_gameobject)
    /// when any are attached.
    pub fn destroy_gameobject(&mut self, gameobject: GameObjectId) -> bool {
        if !self.world.contains(gameobject) {
            warn!(target: "scene", "destroy_gameobject: {:?} does not exist", gameobject);
            return false;
        }

        self.events.remove_gameobject(gameobject);
        self.collisions.remove_gameobject(gameobject);
        self.world.despawn(gameobject);

        debug!(target: "scene", "Destroyed {:?}", gameobject);
        true
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

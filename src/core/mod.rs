//=========================================================================
// Engine Core
//
// Frame-thread subsystems: event dispatch, collision detection and the
// scene graph they operate on.
//
// Responsibilities:
// - Route events from the native and system queues to listeners
// - Detect layered collider overlaps and report them as events
// - Own the per-frame sequence of both via the SystemController
//
// Notes:
// Everything here runs on the single frame thread. Only the native
// queue sender is meant to be handed to other producers.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod collision;
pub mod event;
pub mod globals;
pub mod scene;

//=== Public API ==========================================================

pub use collision::{Collider, CollisionError, CollisionSystem};
pub use event::{Event, EventSystem, EventTypeId, Payload, Scope};
pub use globals::{GlobalContext, SystemController};
pub use scene::{GameObjectId, ListenerOwner, World};

//=== TickControl =========================================================
//
// Defines control flow for the frame loop.
// Each drain can signal either to continue or terminate the loop.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

impl TickControl {
    /// `Exit` wins over `Continue`.
    pub fn merge(self, other: TickControl) -> TickControl {
        match (self, other) {
            (TickControl::Continue, TickControl::Continue) => TickControl::Continue,
            _ => TickControl::Exit,
        }
    }
}

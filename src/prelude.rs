//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use relay_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::core::TickControl;
pub use crate::engine::{Engine, EngineBuilder};

// Global systems and context
pub use crate::core::globals::{GlobalContext, System, SystemController};

// Event system
pub use crate::core::event::{
    Event, EventContext, EventListener, EventSender, EventSystem, EventTypeId, ListenerTable, Payload,
    RoutingTarget, Scope, UiLayer, Value,
};

// Collision system
pub use crate::core::collision::{Collider, CollisionError, CollisionSystem, Rect, RectMode};

// Scene system
pub use crate::core::scene::{ComponentRef, GameObjectId, ListenerOwner, SceneError, World};

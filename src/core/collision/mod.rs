//=========================================================================
// Collision System
//=========================================================================
//
// Layered overlap detection that reports through the event system.
//
// Architecture:
//   colliders:    HashMap<ColliderId, Collider>
//   layers:       HashMap<String, Vec<ColliderId>>
//   interactions: BTreeSet<Interaction>   (unordered layer pairs)
//
// Per frame, once per pass (solid, then trigger):
//   interaction → get_groups() → mask overlap → EventSender::send()
//
//=========================================================================

//=== Module Declarations =================================================

mod collider;
mod collision_system;
mod mask;

//=== Public API ==========================================================

pub use collider::{Collider, Rect, RectMode};
pub use collision_system::{ColliderId, CollisionSystem, Interaction};
pub use mask::Mask;

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::event::EventTypeId;
use crate::core::scene::GameObjectId;

//=== CollisionError ======================================================

/// Failures while building or registering colliders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollisionError {
    #[error("collider rect must have a positive area, got {width}x{height}")]
    InvalidShape { width: u32, height: u32 },

    #[error("collider owner {0:?} does not exist")]
    UnknownGameObject(GameObjectId),

    #[error("unknown collider {0:?}")]
    UnknownCollider(ColliderId),
}

//=== Pass Selection ======================================================

/// Maps a collision event type to the pass it runs: `true` for the solid
/// pass, `false` for triggers and any other type.
pub fn is_physics(kind: EventTypeId) -> bool {
    kind == EventTypeId::COLLISION
}

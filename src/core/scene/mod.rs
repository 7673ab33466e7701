//=========================================================================
// Scene Graph
//=========================================================================
//
// Scene and game object identity, transforms, and the active scene.
//
// Architecture:
//   World
//     ├─ scenes:  HashMap<String, Scene>         (name → member ids)
//     ├─ objects: HashMap<GameObjectId, GameObject>
//     └─ active:  Option<String>
//
// Ids are never reused, so a stale id simply misses every lookup.
//
//=========================================================================

//=== Module Declarations =================================================

mod world;

//=== Public API ==========================================================

pub use world::{GameObject, Scene, SceneError, Transform, World};

//=== GameObjectId ========================================================

/// Identity of a game object. Unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameObjectId(u64);

impl GameObjectId {
    /// Wraps a raw id. Ids produced this way are unknown to any [`World`].
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

//=== ListenerOwner =======================================================

/// Anything that can own event listeners.
///
/// Listener buckets are keyed by game object; owners that are not game
/// objects themselves resolve to the object they are attached to.
pub trait ListenerOwner {
    /// The game object this owner belongs to.
    fn source(&self) -> GameObjectId;
}

impl ListenerOwner for GameObjectId {
    fn source(&self) -> GameObjectId {
        *self
    }
}

//=== ComponentRef ========================================================

/// Handle to a component slot on a game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    source: GameObjectId,
    slot: usize,
}

impl ComponentRef {
    pub fn new(source: GameObjectId, slot: usize) -> Self {
        Self { source, slot }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl ListenerOwner for ComponentRef {
    fn source(&self) -> GameObjectId {
        self.source
    }
}

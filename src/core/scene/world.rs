//=========================================================================
// World
//=========================================================================
//
// Owns scenes and game objects.
//
// Scenes are registered once by name. Game objects belong to exactly
// one scene and may have a parent within it. Only objects of the
// active scene take part in collision processing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::GameObjectId;

//=== SceneError ==========================================================

/// Scene graph lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("unknown game object {0:?}")]
    UnknownGameObject(GameObjectId),
}

//=== Transform ===========================================================

/// Local 2D transform, relative to the parent when there is one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transform {
    pub x: i32,
    pub y: i32,
    /// Rotation in degrees.
    pub angle: i32,
}

impl Transform {
    pub fn at(x: i32, y: i32) -> Self {
        Self { x, y, angle: 0 }
    }

    /// Moves by `(dx, dy)`, or to `(dx, dy)` when `absolute`.
    pub fn move_by(&mut self, (dx, dy): (i32, i32), absolute: bool) {
        if absolute {
            self.x = dx;
            self.y = dy;
        } else {
            self.x += dx;
            self.y += dy;
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

//=== GameObject ==========================================================

/// A named entity placed in a scene.
#[derive(Debug, Clone)]
pub struct GameObject {
    pub name: String,
    pub transform: Transform,
    scene: String,
    parent: Option<GameObjectId>,
}

impl GameObject {
    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn parent(&self) -> Option<GameObjectId> {
        self.parent
    }
}

//=== Scene ===============================================================

/// A named group of game objects.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    gameobjects: Vec<GameObjectId>,
}

impl Scene {
    pub fn gameobjects(&self) -> &[GameObjectId] {
        &self.gameobjects
    }
}

//=== World ===============================================================

/// Registry of scenes and game objects.
#[derive(Debug, Default)]
pub struct World {
    scenes: HashMap<String, Scene>,
    objects: HashMap<GameObjectId, GameObject>,
    active: Option<String>,
    next_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Scenes -----------------------------------------------------------

    /// Registers an empty scene. Registering an existing name is ignored.
    pub fn register_scene(&mut self, name: &str) {
        if self.scenes.contains_key(name) {
            warn!(target: "scene", "Scene '{}' was already registered, keeping existing", name);
            return;
        }
        debug!(target: "scene", "Registered scene '{}'", name);
        self.scenes.insert(name.to_owned(), Scene::default());
    }

    pub fn has_scene(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    /// Makes `name` the scene whose objects are simulated.
    pub fn set_active_scene(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.has_scene(name) {
            return Err(SceneError::UnknownScene(name.to_owned()));
        }
        info!(target: "scene", "Active scene: '{}'", name);
        self.active = Some(name.to_owned());
        Ok(())
    }

    pub fn active_scene(&self) -> Option<&str> {
        self.active.as_deref()
    }

    //--- Game Objects -----------------------------------------------------

    /// Creates a root object in `scene`.
    pub fn spawn(&mut self, scene: &str, name: &str) -> Result<GameObjectId, SceneError> {
        self.insert(scene.to_owned(), name, None)
    }

    /// Creates an object parented to `parent`, in the parent's scene.
    pub fn spawn_child(&mut self, parent: GameObjectId, name: &str) -> Result<GameObjectId, SceneError> {
        let scene = self
            .objects
            .get(&parent)
            .map(|p| p.scene.clone())
            .ok_or(SceneError::UnknownGameObject(parent))?;
        self.insert(scene, name, Some(parent))
    }

    /// Removes an object. Its children become root objects.
    ///
    /// Returns false when the id is unknown. Only the world is touched;
    /// listeners and colliders are purged by `GlobalContext::destroy_gameobject`.
    pub(crate) fn despawn(&mut self, id: GameObjectId) -> bool {
        let Some(object) = self.objects.remove(&id) else {
            return false;
        };

        if let Some(scene) = self.scenes.get_mut(&object.scene) {
            scene.gameobjects.retain(|&g| g != id);
        }
        for child in self.objects.values_mut().filter(|o| o.parent == Some(id)) {
            child.parent = None;
        }

        debug!(target: "scene", "Despawned {:?} ('{}')", id, object.name);
        true
    }

    pub fn contains(&self, id: GameObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    pub fn scene_of(&self, id: GameObjectId) -> Option<&str> {
        self.objects.get(&id).map(|o| o.scene.as_str())
    }

    /// True when the object lives in the active scene.
    pub fn is_in_active_scene(&self, id: GameObjectId) -> bool {
        match (self.active.as_deref(), self.scene_of(id)) {
            (Some(active), Some(scene)) => active == scene,
            _ => false,
        }
    }

    pub fn transform(&self, id: GameObjectId) -> Option<&Transform> {
        self.objects.get(&id).map(|o| &o.transform)
    }

    pub fn transform_mut(&mut self, id: GameObjectId) -> Option<&mut Transform> {
        self.objects.get_mut(&id).map(|o| &mut o.transform)
    }

    /// Position in scene space: the local position plus every ancestor's.
    ///
    /// Ancestor angles are not applied; a rotated parent translates its
    /// children but does not orbit them.
    pub fn world_position(&self, id: GameObjectId) -> Option<(i32, i32)> {
        let mut object = self.objects.get(&id)?;
        let (mut x, mut y) = object.transform.position();

        while let Some(parent) = object.parent.and_then(|p| self.objects.get(&p)) {
            x += parent.transform.x;
            y += parent.transform.y;
            object = parent;
        }

        Some((x, y))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    //--- Internal Helpers -------------------------------------------------

    fn insert(
        &mut self,
        scene: String,
        name: &str,
        parent: Option<GameObjectId>,
    ) -> Result<GameObjectId, SceneError> {
        let members = self
            .scenes
            .get_mut(&scene)
            .ok_or_else(|| SceneError::UnknownScene(scene.clone()))?;

        let id = GameObjectId(self.next_id);
        self.next_id += 1;
        members.gameobjects.push(id);

        self.objects.insert(
            id,
            GameObject {
                name: name.to_owned(),
                transform: Transform::default(),
                scene,
                parent,
            },
        );
        Ok(id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

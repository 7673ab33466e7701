//=========================================================================
// Collision System
//=========================================================================
//
// Owns collider storage, layer membership and enabled layer pairs.
//
// Emission rules for a colliding pair (a, b):
// - a and b on the same game object: nothing
// - always: event to a's owner with `collides = b's owner`
// - mirrored event to b's owner unless the interaction is a self-pair,
//   where (b, a) is visited on its own
//
// Solid-pass events are system events; trigger events go to the
// gameplay queue.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{BTreeSet, HashMap};

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{is_physics, Collider, CollisionError};
use crate::core::event::{EventSender, EventTypeId, Payload};
use crate::core::scene::{GameObjectId, ListenerOwner, World};

//=== ColliderId ==========================================================

/// Handle to a collider stored in the [`CollisionSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(u32);

//=== Interaction =========================================================

/// Unordered pair of layer names; both equal for a self-pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interaction {
    first: String,
    second: String,
}

impl Interaction {
    pub fn new(layer1: &str, layer2: &str) -> Self {
        let (first, second) = if layer1 <= layer2 { (layer1, layer2) } else { (layer2, layer1) };
        Self {
            first: first.to_owned(),
            second: second.to_owned(),
        }
    }

    /// True when both sides name the same layer.
    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }

    pub fn layers(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }
}

//=== CollisionSystem =====================================================

/// Layer-based collision detection.
#[derive(Default)]
pub struct CollisionSystem {
    colliders: HashMap<ColliderId, Collider>,
    layers: HashMap<String, Vec<ColliderId>>,
    interactions: BTreeSet<Interaction>,
    next_id: u32,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Stores `collider` and adds it to each of its layers.
    ///
    /// # Errors
    ///
    /// [`CollisionError::UnknownGameObject`] when the owner is not in `world`.
    pub fn spawn_collider(&mut self, world: &World, collider: Collider) -> Result<ColliderId, CollisionError> {
        let source = collider.source();
        if !world.contains(source) {
            return Err(CollisionError::UnknownGameObject(source));
        }

        let id = ColliderId(self.next_id);
        self.next_id += 1;

        let layers = collider.layers().to_vec();
        self.colliders.insert(id, collider);
        for layer in &layers {
            self.add(id, layer)?;
        }

        debug!(target: "collision", "Collider {:?} of {:?} on layers {:?}", id, source, layers);
        Ok(id)
    }

    /// Appends a stored collider to `layer`, creating the layer if needed.
    ///
    /// Adding the same collider twice yields two entries.
    pub fn add(&mut self, id: ColliderId, layer: &str) -> Result<(), CollisionError> {
        if !self.colliders.contains_key(&id) {
            return Err(CollisionError::UnknownCollider(id));
        }
        self.layers.entry(layer.to_owned()).or_default().push(id);
        Ok(())
    }

    /// Enables overlap tests between two layers (or a layer and itself).
    pub fn enable_collision(&mut self, layer1: &str, layer2: &str) {
        if self.interactions.insert(Interaction::new(layer1, layer2)) {
            debug!(target: "collision", "Enabled collision {} <-> {}", layer1, layer2);
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    /// Mutable access, e.g. to rescale. Call `update_mask()` after manual
    /// shape changes.
    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(&id)
    }

    /// Members of `name`, empty when the layer does not exist.
    pub fn layer(&self, name: &str) -> &[ColliderId] {
        self.layers.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.interactions.iter()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Colliders taking part in one side of each interaction pass.
    ///
    /// Each group keeps colliders whose `physics` flag equals `physics` and
    /// whose owner lives in the active scene, without duplicates. The flag
    /// is true for a self-pair, where both groups come from the same layer.
    pub fn get_groups(
        &self,
        interaction: &Interaction,
        physics: bool,
        world: &World,
    ) -> (Vec<ColliderId>, Vec<ColliderId>, bool) {
        let (first, second) = interaction.layers();
        let group1 = self.group(first, physics, world);
        let group2 = if interaction.is_self_pair() {
            group1.clone()
        } else {
            self.group(second, physics, world)
        };
        (group1, group2, interaction.is_self_pair())
    }

    //--- Frame Pass -------------------------------------------------------

    /// Runs one pass over every interaction and emits `kind` events.
    ///
    /// `kind` selects the pass: `COLLISION` tests physics colliders and
    /// sends system events, anything else tests triggers and sends
    /// gameplay events.
    pub fn handle_collisions(&mut self, dt: u64, kind: EventTypeId, world: &World, sender: &EventSender) {
        let physics = is_physics(kind);
        let interactions: Vec<Interaction> = self.interactions.iter().cloned().collect();

        for interaction in &interactions {
            let (group1, group2, self_pair) = self.get_groups(interaction, physics, world);

            for (a, b) in self.collide_groups(&group1, &group2, world) {
                let (Some(source_a), Some(source_b)) = (self.source_of(a), self.source_of(b)) else {
                    continue;
                };
                if source_a == source_b {
                    continue;
                }

                Self::emit(sender, kind, source_a, source_b, dt, physics);
                if self_pair {
                    continue;
                }
                Self::emit(sender, kind, source_b, source_a, dt, physics);
            }
        }
    }

    //--- Removal ----------------------------------------------------------

    /// Drops every collider owned by `gameobject` from all layers.
    pub fn remove_gameobject(&mut self, gameobject: GameObjectId) {
        let colliders = &self.colliders;
        for members in self.layers.values_mut() {
            members.retain(|id| colliders.get(id).map(|c| c.source()) != Some(gameobject));
        }
        self.colliders.retain(|_, c| c.source() != gameobject);
    }

    //--- Internal Helpers -------------------------------------------------

    fn group(&self, layer: &str, physics: bool, world: &World) -> Vec<ColliderId> {
        let Some(members) = self.layers.get(layer) else {
            debug!(target: "collision", "Layer '{}' has no colliders", layer);
            return Vec::new();
        };

        let mut group: Vec<ColliderId> = Vec::with_capacity(members.len());
        for id in members {
            let Some(collider) = self.colliders.get(id) else {
                continue;
            };
            if collider.physics() == physics
                && world.is_in_active_scene(collider.source())
                && !group.contains(id)
            {
                group.push(*id);
            }
        }
        group
    }

    /// Every `(a, b)` with `a` in `group1`, `b` in `group2` whose masks
    /// overlap, in group order.
    fn collide_groups(
        &mut self,
        group1: &[ColliderId],
        group2: &[ColliderId],
        world: &World,
    ) -> Vec<(ColliderId, ColliderId)> {
        // warm the lazy masks so the pair loop can stay immutable
        for id in group1.iter().chain(group2) {
            if let Some(collider) = self.colliders.get_mut(id) {
                collider.mask();
            }
        }

        let mut pairs = Vec::new();
        for &a in group1 {
            for &b in group2 {
                if self.collide_mask(a, b, world) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    fn collide_mask(&self, a: ColliderId, b: ColliderId, world: &World) -> bool {
        let (Some(ca), Some(cb)) = (self.colliders.get(&a), self.colliders.get(&b)) else {
            return false;
        };
        let (Some(ra), Some(rb)) = (ca.world_rect(world), cb.world_rect(world)) else {
            return false;
        };
        let (Some(ma), Some(mb)) = (ca.cached_mask(), cb.cached_mask()) else {
            return false;
        };
        ma.overlaps(mb, (rb.x - ra.x, rb.y - ra.y))
    }

    fn source_of(&self, id: ColliderId) -> Option<GameObjectId> {
        self.colliders.get(&id).map(|c| c.source())
    }

    fn emit(
        sender: &EventSender,
        kind: EventTypeId,
        target: GameObjectId,
        collides: GameObjectId,
        dt: u64,
        system: bool,
    ) {
        trace!(target: "collision", "{}: {:?} hit {:?}", kind, target, collides);
        let payload = Payload::new().with("collides", collides).with("dt", dt);
        sender.send(kind, Some(&[target]), payload, system);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Rect Collider
//=========================================================================
//
// Axis-aligned rectangle collider attached to a game object.
//
// The mask is computed lazily and cached until `update_mask()`. Masks
// ignore the owner's rotation and always cover the whole local rect, so
// a rotated collider collides as its unrotated bounding box.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{CollisionError, Mask};
use crate::core::scene::{GameObjectId, ListenerOwner, World};

//=== Rect ================================================================

/// Integer rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width as i32 / 2, self.y + self.height as i32 / 2)
    }

    /// Scales the size by `(fx, fy)` around the rect's center.
    pub fn scaled(&self, (fx, fy): (f32, f32)) -> Rect {
        let width = (self.width as f32 * fx).round().max(1.0) as u32;
        let height = (self.height as f32 * fy).round().max(1.0) as u32;
        let (cx, cy) = self.center();
        Rect::new(cx - width as i32 / 2, cy - height as i32 / 2, width, height)
    }
}

//=== RectMode ============================================================

/// Anchor point of the local rect, named after the pygame rect attributes.
///
/// The anchor's offset inside a rect of the collider's size is added to
/// the owner position, so `Center` moves the rect by `+w/2, +h/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectMode {
    #[default]
    TopLeft,
    MidTop,
    TopRight,
    MidLeft,
    Center,
    MidRight,
    BottomLeft,
    MidBottom,
    BottomRight,
}

impl RectMode {
    /// Offset of the anchor inside a `width` x `height` rect at the origin.
    pub fn anchor(self, width: u32, height: u32) -> (i32, i32) {
        let (w, h) = (width as i32, height as i32);
        match self {
            RectMode::TopLeft => (0, 0),
            RectMode::MidTop => (w / 2, 0),
            RectMode::TopRight => (w, 0),
            RectMode::MidLeft => (0, h / 2),
            RectMode::Center => (w / 2, h / 2),
            RectMode::MidRight => (w, h / 2),
            RectMode::BottomLeft => (0, h),
            RectMode::MidBottom => (w / 2, h),
            RectMode::BottomRight => (w, h),
        }
    }
}

//=== Collider ============================================================

/// Collision shape of a game object.
///
/// `physics` colliders take part in the solid pass and produce
/// `COLLISION` events; the others are triggers and produce `TRIGGER`.
#[derive(Debug, Clone)]
pub struct Collider {
    source: GameObjectId,
    local_rect: Rect,
    rect_mode: RectMode,
    layers: Vec<String>,
    physics: bool,
    debug_mode: bool,
    mask: Option<Mask>,
}

impl Collider {
    /// Creates a collider for `source` on the given layers.
    ///
    /// # Errors
    ///
    /// [`CollisionError::InvalidShape`] when the rect has no area.
    pub fn new<I, S>(source: GameObjectId, rect: Rect, layers: I, physics: bool) -> Result<Self, CollisionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if rect.width == 0 || rect.height == 0 {
            return Err(CollisionError::InvalidShape {
                width: rect.width,
                height: rect.height,
            });
        }

        Ok(Self {
            source,
            local_rect: rect,
            rect_mode: RectMode::default(),
            layers: layers.into_iter().map(Into::into).collect(),
            physics,
            debug_mode: true,
            mask: None,
        })
    }

    pub fn with_rect_mode(mut self, mode: RectMode) -> Self {
        self.rect_mode = mode;
        self
    }

    /// Debug outlines are drawn only when this and the game's debug mode
    /// are both on.
    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn physics(&self) -> bool {
        self.physics
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Outline color for debug drawing: red for solid, blue for trigger.
    pub fn debug_color(&self) -> (u8, u8, u8) {
        if self.physics {
            (255, 0, 0)
        } else {
            (0, 0, 255)
        }
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn local_rect(&self) -> Rect {
        self.local_rect
    }

    /// Rect in scene space, or `None` if the owner no longer exists.
    pub fn world_rect(&self, world: &World) -> Option<Rect> {
        let (wx, wy) = world.world_position(self.source)?;
        let (ox, oy) = self
            .rect_mode
            .anchor(self.local_rect.width, self.local_rect.height);
        Some(Rect::new(
            wx + self.local_rect.x + ox,
            wy + self.local_rect.y + oy,
            self.local_rect.width,
            self.local_rect.height,
        ))
    }

    //--- Mask -------------------------------------------------------------

    /// The cached mask, recomputed first if invalidated.
    pub fn mask(&mut self) -> &Mask {
        let rect = self.local_rect;
        self.mask
            .get_or_insert_with(|| Mask::filled(rect.width, rect.height))
    }

    /// The cached mask without recomputing.
    pub fn cached_mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Invalidates the cached mask after a shape change.
    pub fn update_mask(&mut self) {
        self.mask = None;
    }

    /// Scales the local rect around its center.
    pub fn scale(&mut self, factor: (f32, f32)) {
        self.local_rect = self.local_rect.scaled(factor);
        self.update_mask();
    }
}

impl ListenerOwner for Collider {
    fn source(&self) -> GameObjectId {
        self.source
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

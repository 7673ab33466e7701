//=========================================================================
// Event Types
//=========================================================================
//
// Process-wide integer tags identifying categories of events.
//
// Built-in kinds occupy fixed ids below `FIRST_CUSTOM_ID`. Custom kinds
// are handed out by a monotonic counter and are never reused.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;

//=== EventTypeId =========================================================

/// Opaque tag identifying a category of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventTypeId(u32);

/// First id handed out by [`EventTypeId::custom`].
const FIRST_CUSTOM_ID: u32 = 0x8000;

static NEXT_CUSTOM_ID: AtomicU32 = AtomicU32::new(FIRST_CUSTOM_ID);

impl EventTypeId {
    /// Window close / application quit request.
    pub const QUIT: EventTypeId = EventTypeId(0x100);

    /// Keyboard key pressed. Payload: `key`.
    pub const KEY_DOWN: EventTypeId = EventTypeId(0x300);

    /// Keyboard key released. Payload: `key`.
    pub const KEY_UP: EventTypeId = EventTypeId(0x301);

    /// Generic gameplay notification.
    pub const NOTIFY: EventTypeId = EventTypeId(0x7F00);

    /// Solid collider overlap. Payload: `collides`, `dt`.
    pub const COLLISION: EventTypeId = EventTypeId(0x7F01);

    /// Trigger collider overlap. Payload: `collides`, `dt`.
    pub const TRIGGER: EventTypeId = EventTypeId(0x7F02);

    /// Allocates a fresh event type.
    ///
    /// Intended to be called once per distinct kind, typically when the
    /// owning module initializes. The name is only used for logging.
    pub fn custom(name: &str) -> Self {
        let id = EventTypeId(NEXT_CUSTOM_ID.fetch_add(1, Ordering::Relaxed));
        debug!(target: "events", "Registered event type '{}' as {}", name, id.0);
        id
    }

    /// Raw integer value of the tag.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// True for kinds allocated through [`EventTypeId::custom`].
    pub fn is_custom(self) -> bool {
        self.0 >= FIRST_CUSTOM_ID
    }
}

impl fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::QUIT => write!(f, "Quit"),
            Self::KEY_DOWN => write!(f, "KeyDown"),
            Self::KEY_UP => write!(f, "KeyUp"),
            Self::NOTIFY => write!(f, "Notify"),
            Self::COLLISION => write!(f, "Collision"),
            Self::TRIGGER => write!(f, "Trigger"),
            Self(raw) => write!(f, "UserEvent({})", raw),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_types_are_unique() {
        let a = EventTypeId::custom("a");
        let b = EventTypeId::custom("b");
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn custom_types_never_collide_with_builtins() {
        let custom = EventTypeId::custom("score");
        assert!(custom.is_custom());
        for builtin in [
            EventTypeId::QUIT,
            EventTypeId::KEY_DOWN,
            EventTypeId::KEY_UP,
            EventTypeId::NOTIFY,
            EventTypeId::COLLISION,
            EventTypeId::TRIGGER,
        ] {
            assert!(!builtin.is_custom());
            assert_ne!(builtin, custom);
        }
    }

    #[test]
    fn display_names_builtins() {
        assert_eq!(EventTypeId::COLLISION.to_string(), "Collision");
        assert_eq!(EventTypeId::QUIT.to_string(), "Quit");
    }
}

//=========================================================================
// Platform Event Mapper
//
// Converts Winit window events to engine `Event`s for the native queue.
//
// Responsibilities:
// - Translate close requests into QUIT broadcasts
// - Translate keyboard input into KEY_DOWN / KEY_UP broadcasts
// - Ignore everything else (focus, resize, cursor, ...)
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::PhysicalKey;

//=== Internal Dependencies ===============================================

use crate::core::event::{Event, EventTypeId, Payload};

//=== Full Event Conversion ===============================================
//
// Keyboard payload:
//   key:    physical key name, "Unidentified" when unmapped
//   repeat: true for OS auto-repeat
//

/// Maps a window event to the engine event it produces, if any.
pub(crate) fn translate(event: &WindowEvent) -> Option<Event> {
    match event {
        //--- Window Lifecycle --------------------------------------------
        WindowEvent::CloseRequested => Some(Event::broadcast(EventTypeId::QUIT, Payload::new())),

        //--- Keyboard Input ----------------------------------------------
        WindowEvent::KeyboardInput { event, .. } => Some(key_event(event)),

        //--- Unhandled Events --------------------------------------------
        _ => None,
    }
}

fn key_event(event: &KeyEvent) -> Event {
    let kind = match event.state {
        ElementState::Pressed => EventTypeId::KEY_DOWN,
        ElementState::Released => EventTypeId::KEY_UP,
    };
    let payload = Payload::new()
        .with("key", key_name(event.physical_key))
        .with("repeat", event.repeat);
    Event::broadcast(kind, payload)
}

fn key_name(key: PhysicalKey) -> String {
    match key {
        PhysicalKey::Code(code) => format!("{:?}", code),
        PhysicalKey::Unidentified(_) => "Unidentified".to_owned(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

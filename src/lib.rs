//=========================================================================
// Relay Engine: Library Root
//
// This crate defines the public API surface of the Relay Engine.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the core subsystems (events, collision, scenes) for
//   listener and game-object code
// - Keep the Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use relay_engine::EngineBuilder;
//
// fn main() {
//     EngineBuilder::new().build().run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the event system, collision system and scene graph.
// Application code mostly reaches it through `GlobalContext` in
// `Engine::init` or through the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window and the event loop; it is not part of the
// public API surface apart from its error type.
//
// `engine` defines the main engine entry point and initialization logic.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
pub use platform::PlatformError;

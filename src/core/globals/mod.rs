//=========================================================================
// Global Engine State
//=========================================================================
//
// Separates systems (frame sequencing) from context (owned state).
//
// Architecture:
//   GlobalContext:    World + EventSystem + CollisionSystem + listener
//                     tables (passed to init and extended systems)
//   SystemController: ordered sequence hooks + extended systems
//                     (owned by the engine, drives one frame)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod system_controller;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
pub use system_controller::{SequenceHook, System, SystemController};

//=========================================================================
// Relay Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Platform loop]
//         │                          │
//         ├─ with_fps()              ├─ init(|ctx| ...)
//         ├─ with_native_queue_      ├─ step(dt)   one frame
//         │  capacity()              └─ run()      blocks until exit
//         ├─ with_window_title()
//         └─ with_window_size()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::event::EventSender;
use crate::core::globals::{GlobalContext, System, SystemController};
use crate::core::scene::GameObjectId;
use crate::core::TickControl;
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **FPS**: 60.0 (frames per second)
/// - **Native queue capacity**: 1024 events
/// - **Window**: "Relay Engine", 800x600
///
/// # Examples
///
/// ```no_run
/// use relay_engine::EngineBuilder;
///
/// EngineBuilder::new()
///     .with_fps(120.0)
///     .with_native_queue_capacity(4096)
///     .build()
///     .init(|ctx| {
///         ctx.world.register_scene("level");
///         ctx.world.set_active_scene("level").unwrap();
///         ctx.collisions.enable_collision("player", "enemy");
///     })
///     .run();
/// ```
pub struct EngineBuilder {
    fps: f64,
    native_queue_capacity: usize,
    window_title: String,
    window_size: (u32, u32),
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            fps: 60.0,
            native_queue_capacity: 1024,
            window_title: "Relay Engine".to_owned(),
            window_size: (800, 600),
        }
    }

    /// Sets the target frames per second.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "FPS must be positive, got {}", fps);
        self.fps = fps;
        self
    }

    /// Sets how many gameplay events the native queue buffers between
    /// frames. Events posted into a full queue are dropped with a warning.
    ///
    /// Default: 1024
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_native_queue_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Native queue capacity must be positive");
        self.native_queue_capacity = capacity;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Builds the engine instance with empty subsystems.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (FPS: {}, native queue: {})",
            self.fps, self.native_queue_capacity
        );

        Engine {
            context: GlobalContext::new(self.native_queue_capacity),
            controller: SystemController::new(),
            fps: self.fps,
            window_title: self.window_title,
            window_size: self.window_size,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Relay Engine runtime.
///
/// Owns the [`GlobalContext`] and the [`SystemController`] that steps it.
/// Create via [`EngineBuilder`].
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► SystemController (once per frame)
///   │     ├─► EventSystem::update        (native queue)
///   │     ├─► CollisionSystem  COLLISION (system queue)
///   │     └─► CollisionSystem  TRIGGER   (native queue)
///   │
///   └─► Platform (Event Loop)
///         └─► Window, keyboard, quit → native queue
/// ```
pub struct Engine {
    context: GlobalContext,
    controller: SystemController,
    fps: f64,
    window_title: String,
    window_size: (u32, u32),
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Configures the context before the first frame: scenes, game
    /// objects, colliders, interactions and listeners.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalContext),
    {
        info!("Initializing engine systems");
        init_fn(&mut self.context);
        info!("Engine initialization complete");
        self
    }

    /// Attaches an extended system, updated after the core sequence.
    pub fn with_system(mut self, system: Box<dyn System>) -> Self {
        self.controller.add_system(system);
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn context(&self) -> &GlobalContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut GlobalContext {
        &mut self.context
    }

    /// Handle for posting events from outside the frame.
    pub fn sender(&self) -> &EventSender {
        self.context.events.sender()
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub(crate) fn window_title(&self) -> &str {
        &self.window_title
    }

    pub(crate) fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one frame of `dt` milliseconds.
    pub fn step(&mut self, dt: u64) -> TickControl {
        self.controller.update(&mut self.context, dt)
    }

    /// Removes `gameobject` from every subsystem.
    pub fn destroy_gameobject(&mut self, gameobject: GameObjectId) -> bool {
        self.controller.destroy_gameobject(&mut self.context, gameobject)
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and steps frames until a quit event is dispatched
    /// or the window is closed.
    ///
    /// Platform errors are logged; the call then returns.
    pub fn run(self) {
        info!("Starting engine runtime (FPS: {})", self.fps);

        let platform = Platform::new(self);
        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }

        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

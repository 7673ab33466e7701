//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the engine's native event queue
// and paces the frame loop.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────┐
//  │  Winit Event Loop                        │
//  │   ↓                                      │
//  │  event_mapper::translate()               │
//  │   ├─ CloseRequested → QUIT               │
//  │   └─ KeyboardInput  → KEY_DOWN / KEY_UP  │
//  │   ↓                                      │
//  │  EventSender::post() ──► native queue    │
//  │                                          │
//  │  about_to_wait: request redraw at FPS    │
//  │  RedrawRequested: Engine::step(dt)       │
//  │   └─ Exit → event_loop.exit()            │
//  └──────────────────────────────────────────┘
// ```
//
// Notes:
// - The engine is single-threaded; all frame work happens on the thread
//   that called `Engine::run()` (a Winit requirement on macOS/iOS).
// - A close request always ends the loop after the next frame, even if
//   the native queue dropped the QUIT event.
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== External Crates =====================================================

use std::time::{Duration, Instant};

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::TickControl;
use crate::engine::Engine;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop the engine cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}

//=== Platform ============================================================

/// Window owner and frame pacer.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(engine)`
/// 2. **Execution**: `platform.run()` blocks in the Winit event loop
/// 3. **Frames**: one `Engine::step` per `RedrawRequested`, at most `fps`
///    times per second
/// 4. **Shutdown**: a step returning `Exit` leaves the loop
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    engine: Engine,

    frame_duration: Duration,
    last_frame: Instant,
    next_frame: Instant,

    /// Set by a close request; the next frame ends the loop.
    closing: bool,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub fn new(engine: Engine) -> Self {
        let frame_duration = Duration::from_secs_f64(1.0 / engine.fps());
        let now = Instant::now();
        info!(target: "platform", "Platform subsystem initialized ({:?} per frame)", frame_duration);
        Self {
            window: None,
            engine,
            frame_duration,
            last_frame: now,
            next_frame: now,
            closing: false,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until a frame requests exit.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Steps the engine once with the wall time since the last frame.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_millis() as u64;
        self.last_frame = now;

        let control = self.engine.step(dt);
        if control == TickControl::Exit || self.closing {
            info!(target: "platform", "Frame loop exiting");
            event_loop.exit();
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let (width, height) = self.engine.window_size();
        let attrs = WindowAttributes::default()
            .with_title(self.engine.window_title())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(translated) = event_mapper::translate(&event) {
            trace!(target: "platform", "Posting {}", translated.kind());
            self.engine.sender().post(translated);
        }

        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.closing = true;
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.frame(event_loop),

            _ => {}
        }
    }

    /// Schedules the next redraw at the configured frame rate.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame = now + self.frame_duration;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

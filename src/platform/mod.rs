//=========================================================================
// Platform Subsystem
//
// Native window and input source consumed by the engine loop.
//
// Architecture:
// ```text
//  Engine::run()  (single thread, owns the frame loop)
//   │
//   ├─ window.poll_events(&mut callback)
//   │     │
//   │     ├─ WinitWindow:    pump_app_events(timeout = 0)
//   │     │                    → InputProcessor → Event → callback
//   │     │
//   │     └─ HeadlessWindow: next scripted batch → callback
//   │
//   ├─ update / render
//   └─ window.swap_buffers()
// ```
//
// Key Design Decisions:
// - **Engine owns the loop**: winit is pumped once per frame instead of
//   `run_app`, so control returns to the engine between frames
// - **Synchronous delivery**: every translated event re-enters the
//   engine's callback inside `poll_events`; nothing is queued
// - **Main thread requirement**: winit mandates the main thread on
//   macOS/iOS, so `WinitWindow` must be created and pumped there
//
//=========================================================================

//=== Submodules ==========================================================

mod headless;
mod input_processor;
mod winit_window;

//=== Public API ==========================================================

pub use headless::HeadlessWindow;
pub use winit_window::WinitWindow;

use crate::core::event::Event;

//=== NativeWindow ========================================================

/// Window + input source driven by the engine once per frame.
pub trait NativeWindow {
    /// Delivers every pending native event to `callback`, synchronously
    /// and in arrival order.
    fn poll_events(&mut self, callback: &mut dyn FnMut(&mut Event));

    /// `true` once the user or OS asked the window to close.
    fn should_close(&self) -> bool;

    /// Presents the frame that was just rendered.
    fn swap_buffers(&mut self);

    /// Framebuffer size in physical pixels.
    fn size(&self) -> (u32, u32);

    fn set_vsync(&mut self, _enabled: bool) {}
}

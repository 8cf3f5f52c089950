//=========================================================================
// Winit Window
//=========================================================================
//
// Desktop window backed by a winit event loop in pump mode.
//
// Lifecycle:
//   new()          → EventLoop::new() + one pump, window created in resumed()
//   poll_events()  → pump_app_events(0) → WindowEvent → Event → callback
//   swap_buffers() → pre_present_notify() + request_redraw()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, error, info, trace};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::OsError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

//=== Internal Dependencies ===============================================

use super::input_processor::InputProcessor;
use super::NativeWindow;
use crate::config::WindowConfig;
use crate::core::event::{Event, WindowClose};
use crate::error::PlatformError;

//=== WindowState =========================================================

/// Everything the pump handler mutates between pumps.
struct WindowState {
    title: String,
    requested_size: (u32, u32),
    window: Option<Window>,
    creation_error: Option<OsError>,
    input: InputProcessor,
    close_requested: bool,
    vsync: bool,
}

impl WindowState {
    fn attributes(&self) -> winit::window::WindowAttributes {
        let (width, height) = self.requested_size;
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(width, height))
    }

    /// Translates one window event; empty for events the engine ignores.
    fn translate(&mut self, event: WindowEvent) -> Vec<Event> {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close_requested = true;
                vec![Event::new(WindowClose)]
            }

            WindowEvent::Resized(size) => vec![self.input.process_resize(size)],

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let mut events: Vec<Event> = self
                    .input
                    .process_key(key_event.physical_key, key_event.state, key_event.repeat)
                    .into_iter()
                    .collect();
                events.extend(
                    self.input
                        .process_text(key_event.text.as_deref(), key_event.state),
                );
                events
            }

            WindowEvent::CursorMoved { position, .. } => {
                vec![self.input.process_mouse_move(position.x, position.y)]
            }

            WindowEvent::MouseWheel { delta, .. } => vec![self.input.process_scroll(delta)],

            WindowEvent::MouseInput { state, button, .. } => {
                vec![self.input.process_mouse_button(button, state)]
            }

            _ => Vec::new(),
        }
    }
}

//=== PumpHandler =========================================================

/// Borrowed for the duration of one pump.
struct PumpHandler<'a> {
    state: &'a mut WindowState,
    sink: &'a mut dyn FnMut(&mut Event),
}

impl ApplicationHandler for PumpHandler<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        match event_loop.create_window(self.state.attributes()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.state.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.state.creation_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        for mut translated in self.state.translate(event) {
            trace!(target: "platform::input", "{}", translated);
            (self.sink)(&mut translated);
        }
    }
}

//=== WinitWindow =========================================================

/// OS window driven by the engine's frame loop.
///
/// Must be created and polled on the main thread.
pub struct WinitWindow {
    event_loop: EventLoop<()>,
    state: WindowState,
}

impl WinitWindow {
    /// Creates the event loop and the window.
    ///
    /// # Errors
    ///
    /// [`PlatformError`] if the event loop or the window cannot be created.
    pub fn new(config: &WindowConfig) -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new()?;

        let mut window = Self {
            event_loop,
            state: WindowState {
                title: config.title.clone(),
                requested_size: (config.width, config.height),
                window: None,
                creation_error: None,
                input: InputProcessor::new(),
                close_requested: false,
                vsync: config.vsync,
            },
        };

        // The first pump delivers `resumed`, which creates the window.
        window.pump(&mut |_: &mut Event| {});

        if let Some(err) = window.state.creation_error.take() {
            return Err(PlatformError::WindowCreation(err));
        }
        if window.state.window.is_none() {
            return Err(PlatformError::WindowUnavailable);
        }

        Ok(window)
    }

    pub fn window(&self) -> Option<&Window> {
        self.state.window.as_ref()
    }

    pub fn vsync(&self) -> bool {
        self.state.vsync
    }

    fn pump(&mut self, sink: &mut dyn FnMut(&mut Event)) {
        let mut handler = PumpHandler { state: &mut self.state, sink };
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut handler);

        if let PumpStatus::Exit(code) = status {
            debug!(target: "platform", "Event loop exited with code {}", code);
            self.state.close_requested = true;
        }
    }
}

impl NativeWindow for WinitWindow {
    fn poll_events(&mut self, callback: &mut dyn FnMut(&mut Event)) {
        self.pump(callback);
    }

    fn should_close(&self) -> bool {
        self.state.close_requested
    }

    fn swap_buffers(&mut self) {
        if let Some(window) = &self.state.window {
            window.pre_present_notify();
            window.request_redraw();
        }
    }

    fn size(&self) -> (u32, u32) {
        match &self.state.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => self.state.requested_size,
        }
    }

    /// Recorded for the graphics backend; winit itself has no swap
    /// interval control.
    fn set_vsync(&mut self, enabled: bool) {
        debug!(target: "platform", "VSync {}", if enabled { "enabled" } else { "disabled" });
        self.state.vsync = enabled;
    }
}

//=========================================================================
// Orrery Engine
//
// Main entry point and frame loop.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [frame loop]
//         │                          │
//         ├─ with_size()             ├─ window:   Box<dyn NativeWindow>
//         ├─ with_config()           ├─ renderer: Renderer
//         ├─ with_window()           ├─ scene:    Option<Scene>
//         └─ with_backend()          └─ clock:    FrameClock
// ```
//
// One frame:
// ```text
// dt = clock.tick()
// window.poll_events() ──> on_event() ──> [WindowClose? stop] ──> scene
// scene.update(dt)
// renderer.clear() → scene.render() → renderer.present()
// window.swap_buffers()
// ```
//
//=========================================================================

//=== Submodules ==========================================================

mod clock;

pub use clock::FrameClock;

//=== External Dependencies ===============================================

use glam::Vec4;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::config::EngineConfig;
use crate::core::event::{Event, EventDispatcher, WindowClose, WindowResize};
use crate::core::render::{HeadlessBackend, RenderBackend, Renderer};
use crate::core::scene::Scene;
use crate::error::EngineError;
use crate::logging;
use crate::platform::{NativeWindow, WinitWindow};

//=== EngineState =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Constructed,
    Initialized,
    Running,
    Shutdown,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Window**: 1280x720, "Orrery Engine", vsync on, native (winit)
/// - **Backend**: [`HeadlessBackend`]
/// - **Renderer**: see [`RendererConfig`](crate::config::RendererConfig)
///
/// # Examples
///
/// ```no_run
/// use orrery_engine::EngineBuilder;
///
/// let mut engine = EngineBuilder::new()
///     .with_size(1280, 1280)
///     .with_title("Particles")
///     .build()?;
/// engine.run()?;
/// # Ok::<(), orrery_engine::EngineError>(())
/// ```
///
/// Display-less, for tests and CI:
/// ```
/// use orrery_engine::EngineBuilder;
/// use orrery_engine::platform::HeadlessWindow;
///
/// let mut engine = EngineBuilder::new()
///     .with_window(HeadlessWindow::new(320, 240).with_frame_budget(3))
///     .build()?;
/// engine.run()?;
/// assert_eq!(engine.frame_count(), 3);
/// # Ok::<(), orrery_engine::EngineError>(())
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    window: Option<Box<dyn NativeWindow>>,
    backend: Option<Box<dyn RenderBackend>>,
    scene: Option<Scene>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            window: None,
            backend: None,
            scene: None,
        }
    }

    /// Sets the window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if `width == 0` or `height == 0`.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0, "Window width must be positive");
        assert!(height > 0, "Window height must be positive");
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.window.title = title.into();
        self
    }

    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.config.window.vsync = enabled;
        self
    }

    pub fn with_clear_color(mut self, color: Vec4) -> Self {
        self.config.renderer.clear_color = color.to_array();
        self
    }

    /// Replaces the whole configuration, e.g. one read with
    /// [`EngineConfig::load`].
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `window` instead of opening a native window.
    pub fn with_window(mut self, window: impl NativeWindow + 'static) -> Self {
        self.window = Some(Box::new(window));
        self
    }

    pub fn with_backend(mut self, backend: impl RenderBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Builds and initializes the engine.
    ///
    /// # Errors
    ///
    /// [`EngineError::Platform`] if the native window cannot be created,
    /// [`EngineError::Render`] if the backend fails to initialize.
    pub fn build(self) -> Result<Engine, EngineError> {
        logging::init();

        let window_config = &self.config.window;
        info!(target: "engine", "Building engine ({}x{}, '{}')",
            window_config.width, window_config.height, window_config.title);

        let mut window: Box<dyn NativeWindow> = match self.window {
            Some(window) => window,
            None => Box::new(WinitWindow::new(window_config)?),
        };
        window.set_vsync(window_config.vsync);

        let backend = self
            .backend
            .unwrap_or_else(|| Box::new(HeadlessBackend::new()));
        let renderer = Renderer::with_config(backend, &self.config.renderer);

        let mut engine = Engine {
            window,
            renderer,
            scene: self.scene,
            clock: FrameClock::new(),
            running: false,
            state: EngineState::Constructed,
            frame_count: 0,
            config: self.config,
        };
        engine.initialize()?;

        Ok(engine)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Orrery Engine runtime: owns the window, renderer, active scene and
/// frame clock, and drives the frame loop on the calling thread.
///
/// Create via [`Engine::new`] or [`EngineBuilder`].
pub struct Engine {
    window: Box<dyn NativeWindow>,
    renderer: Renderer,
    scene: Option<Scene>,
    clock: FrameClock,
    running: bool,
    state: EngineState,
    frame_count: u64,
    config: EngineConfig,
}

impl Engine {
    //--- Construction -----------------------------------------------------

    /// Opens a `width`x`height` window titled `title` and initializes the
    /// renderer.
    ///
    /// # Errors
    ///
    /// See [`EngineBuilder::build`].
    pub fn new(width: u32, height: u32, title: &str) -> Result<Self, EngineError> {
        EngineBuilder::new()
            .with_size(width, height)
            .with_title(title)
            .build()
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        self.renderer.initialize()?;

        let (width, height) = self.window.size();
        self.renderer.set_viewport(0, 0, width, height);

        self.running = true;
        self.state = EngineState::Initialized;
        info!(target: "engine", "Engine initialized");
        Ok(())
    }

    //--- Execution --------------------------------------------------------

    /// Runs the frame loop until the window closes or a `WindowClose`
    /// event stops the engine.
    ///
    /// # Lifecycle
    ///
    /// 1. Resets the frame clock and initializes the active scene
    /// 2. Per frame: tick → poll events → update → render → swap
    /// 3. On exit: shuts the active scene down
    ///
    /// # Errors
    ///
    /// Returns the scene's init error; the loop is not entered.
    pub fn run(&mut self) -> Result<(), EngineError> {
        self.clock.reset();

        if let Some(scene) = self.scene.as_mut() {
            scene.init()?;
        }

        self.state = EngineState::Running;
        info!(target: "engine", "Entering frame loop");

        while self.running && !self.window.should_close() {
            let dt = self.clock.tick();

            self.poll_events();
            self.update(dt);
            self.render();

            self.window.swap_buffers();
            self.frame_count += 1;
        }

        if let Some(scene) = self.scene.as_mut() {
            scene.shutdown();
        }

        self.running = false;
        self.state = EngineState::Shutdown;
        info!(target: "engine", "Frame loop exited after {} frames ({:.1} fps)",
            self.frame_count, self.clock.fps());
        Ok(())
    }

    /// Routes one event: engine-level handling first, then the scene.
    ///
    /// `WindowClose` stops the engine and is consumed here, so no scene
    /// can veto it.
    pub fn on_event(&mut self, event: &mut Event) {
        Self::route_event(&mut self.running, &mut self.renderer, self.scene.as_mut(), event);
    }

    /// Stops the loop after the current frame.
    pub fn stop(&mut self) {
        self.running = false;
    }

    //--- Scene ------------------------------------------------------------

    /// Installs `scene` as the active scene, returning the previous one.
    pub fn set_scene(&mut self, scene: Scene) -> Option<Scene> {
        if self.state == EngineState::Running {
            warn!(target: "engine", "Scene replaced while running; it will not be initialized");
        }
        debug!(target: "engine", "Active scene set");
        self.scene.replace(scene)
    }

    pub fn take_scene(&mut self) -> Option<Scene> {
        self.scene.take()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    //--- Accessors --------------------------------------------------------

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn window(&self) -> &dyn NativeWindow {
        &*self.window
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    //--- Internal Helpers -------------------------------------------------

    fn poll_events(&mut self) {
        let Self { window, renderer, scene, running, .. } = self;
        window.poll_events(&mut |event: &mut Event| {
            Self::route_event(running, renderer, scene.as_mut(), event)
        });
    }

    fn update(&mut self, dt: f32) {
        if let Some(scene) = self.scene.as_mut() {
            scene.update(dt);
        }
    }

    fn render(&mut self) {
        self.renderer.clear();

        if let Some(scene) = self.scene.as_mut() {
            scene.render(&mut self.renderer);
        }

        self.renderer.present();
    }

    fn route_event(
        running: &mut bool,
        renderer: &mut Renderer,
        scene: Option<&mut Scene>,
        event: &mut Event,
    ) {
        let mut dispatcher = EventDispatcher::new(event);

        dispatcher.dispatch::<WindowClose, _>(|_| {
            info!(target: "engine", "Window close received, stopping");
            *running = false;
            true
        });

        // Viewport follows the window; scenes still see the resize.
        dispatcher.dispatch::<WindowResize, _>(|resize| {
            renderer.set_viewport(0, 0, resize.width, resize.height);
            // Minimised windows report a zero dimension; keep the last aspect.
            if resize.width > 0 && resize.height > 0 {
                if let Some(camera) = renderer.camera() {
                    camera
                        .borrow_mut()
                        .set_aspect_ratio(resize.width as f32 / resize.height as f32);
                }
            }
            false
        });

        if event.handled {
            return;
        }

        if let Some(scene) = scene {
            scene.dispatch_event(event);
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("running", &self.running)
            .field("frame_count", &self.frame_count)
            .field("scene", &self.scene)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::event::{KeyCode, KeyPressed};
    use crate::core::render::testing::{Call, RecordingBackend};
    use crate::core::render::Camera;
    use crate::core::scene::{Entities, SceneHooks, SceneState};
    use crate::error::BehaviorError;
    use crate::platform::HeadlessWindow;

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Scene hooks that journal every call and every event they see.
    struct Recorder {
        journal: Journal,
    }

    impl SceneHooks for Recorder {
        fn on_init(&mut self, _entities: &mut Entities) -> Result<(), EngineError> {
            self.journal.borrow_mut().push("init".into());
            Ok(())
        }

        fn on_shutdown(&mut self, _entities: &mut Entities) {
            self.journal.borrow_mut().push("shutdown".into());
        }

        fn on_update(&mut self, _entities: &mut Entities, _dt: f32) {
            self.journal.borrow_mut().push("update".into());
        }

        fn on_event(&mut self, _entities: &mut Entities, event: &mut Event) {
            self.journal
                .borrow_mut()
                .push(format!("event:{}:{}", event.name(), event.handled));
        }
    }

    struct BrokenScene;

    impl SceneHooks for BrokenScene {
        fn on_init(&mut self, _entities: &mut Entities) -> Result<(), EngineError> {
            Err(BehaviorError::Other("missing asset".into()).into())
        }
    }

    fn headless_engine(window: HeadlessWindow) -> Engine {
        EngineBuilder::new().with_window(window).build().unwrap()
    }

    fn recorded_scene() -> (Scene, Journal) {
        let journal = Journal::default();
        (Scene::new(Recorder { journal: Rc::clone(&journal) }), journal)
    }

    fn count(journal: &Journal, entry: &str) -> usize {
        journal.borrow().iter().filter(|e| *e == entry).count()
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.config, EngineConfig::default());
        assert!(builder.window.is_none());
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let builder = EngineBuilder::new()
            .with_size(640, 480)
            .with_title("Test")
            .with_vsync(false)
            .with_clear_color(Vec4::ONE);

        assert_eq!(builder.config.window.width, 640);
        assert_eq!(builder.config.window.height, 480);
        assert_eq!(builder.config.window.title, "Test");
        assert!(!builder.config.window.vsync);
        assert_eq!(builder.config.renderer.clear_color, [1.0; 4]);
    }

    #[test]
    #[should_panic(expected = "Window width must be positive")]
    fn builder_with_size_panics_on_zero_width() {
        EngineBuilder::new().with_size(0, 600);
    }

    #[test]
    #[should_panic(expected = "Window height must be positive")]
    fn builder_with_size_panics_on_zero_height() {
        EngineBuilder::new().with_size(800, 0);
    }

    #[test]
    fn build_initializes_engine() {
        let backend = RecordingBackend::new();
        let log = backend.log();
        let engine = EngineBuilder::new()
            .with_window(HeadlessWindow::new(320, 200))
            .with_backend(backend)
            .build()
            .unwrap();

        assert_eq!(engine.state(), EngineState::Initialized);
        assert!(engine.is_running());
        assert_eq!(engine.renderer().viewport(), (0, 0, 320, 200));
        assert!(log.borrow().contains(&Call::Viewport(0, 0, 320, 200)));
    }

    #[test]
    fn build_fails_when_backend_cannot_initialize() {
        let result = EngineBuilder::new()
            .with_window(HeadlessWindow::new(1, 1))
            .with_backend(RecordingBackend::new().failing_init("context lost"))
            .build();

        match result {
            Err(EngineError::Render(message)) => assert_eq!(message, "context lost"),
            Err(other) => panic!("expected EngineError::Render, got {}", other),
            Ok(_) => panic!("build must fail when the backend cannot initialize"),
        }
    }

    //=====================================================================
    // Event Routing Tests
    //=====================================================================

    #[test]
    fn window_close_stops_engine_before_scene_sees_it() {
        let mut engine = headless_engine(HeadlessWindow::new(1, 1));
        let (scene, journal) = recorded_scene();
        engine.set_scene(scene);

        let mut event = Event::new(WindowClose);
        engine.on_event(&mut event);

        assert!(!engine.is_running());
        assert!(event.handled);
        assert!(journal.borrow().is_empty(), "scene must never see the close");
    }

    #[test]
    fn other_events_reach_the_scene_unhandled() {
        let mut engine = headless_engine(HeadlessWindow::new(1, 1));
        let (scene, journal) = recorded_scene();
        engine.set_scene(scene);

        engine.on_event(&mut Event::new(KeyPressed { key: KeyCode::KeyA, repeat_count: 0 }));

        assert!(engine.is_running());
        assert_eq!(*journal.borrow(), vec!["event:KeyPressed:false"]);
    }

    #[test]
    fn resize_updates_viewport_and_camera_then_reaches_scene() {
        let mut engine = headless_engine(HeadlessWindow::new(100, 100));
        let camera = Camera::default().into_shared();
        engine.renderer_mut().set_camera(Some(Rc::clone(&camera)));
        let (scene, journal) = recorded_scene();
        engine.set_scene(scene);

        engine.on_event(&mut Event::new(WindowResize { width: 800, height: 400 }));

        assert_eq!(engine.renderer().viewport(), (0, 0, 800, 400));
        assert_eq!(camera.borrow().aspect_ratio(), 2.0);
        assert_eq!(*journal.borrow(), vec!["event:WindowResize:false"]);
    }

    #[test]
    fn zero_sized_resize_keeps_projection_finite() {
        let mut engine = headless_engine(HeadlessWindow::new(100, 100));
        let camera = Camera::default().into_shared();
        engine.renderer_mut().set_camera(Some(Rc::clone(&camera)));
        let aspect_before = camera.borrow().aspect_ratio();

        engine.on_event(&mut Event::new(WindowResize { width: 0, height: 600 }));
        engine.on_event(&mut Event::new(WindowResize { width: 800, height: 0 }));

        assert_eq!(camera.borrow().aspect_ratio(), aspect_before);
        assert!(camera.borrow().projection_matrix().is_finite());
        assert_eq!(engine.renderer().viewport(), (0, 0, 800, 0));
    }

    #[test]
    fn events_without_scene_are_harmless() {
        let mut engine = headless_engine(HeadlessWindow::new(1, 1));
        let mut event = Event::new(KeyPressed { key: KeyCode::Escape, repeat_count: 0 });
        engine.on_event(&mut event);
        assert!(!event.handled);
    }

    //=====================================================================
    // Frame Loop Tests
    //=====================================================================

    #[test]
    fn run_drives_scene_lifecycle_for_each_frame() {
        let mut engine = headless_engine(HeadlessWindow::new(64, 64).with_frame_budget(3));
        let (scene, journal) = recorded_scene();
        engine.set_scene(scene);

        engine.run().unwrap();

        assert_eq!(engine.frame_count(), 3);
        assert_eq!(engine.state(), EngineState::Shutdown);
        assert_eq!(count(&journal, "init"), 1);
        assert_eq!(count(&journal, "update"), 3);
        assert_eq!(count(&journal, "shutdown"), 1);
        assert_eq!(journal.borrow().first().map(String::as_str), Some("init"));
        assert_eq!(journal.borrow().last().map(String::as_str), Some("shutdown"));
        assert_eq!(engine.scene().map(Scene::state), Some(SceneState::Terminated));
    }

    #[test]
    fn close_event_finishes_the_current_frame_then_exits() {
        let mut window = HeadlessWindow::new(64, 64);
        window.push_frame_events(Vec::new());
        window.push_frame_events([Event::new(WindowClose)]);
        let mut engine = headless_engine(window);
        let (scene, journal) = recorded_scene();
        engine.set_scene(scene);

        engine.run().unwrap();

        assert_eq!(engine.frame_count(), 2);
        assert_eq!(count(&journal, "update"), 2);
        assert!(!engine.is_running());
    }

    #[test]
    fn each_frame_clears_and_presents() {
        let backend = RecordingBackend::new();
        let log = backend.log();
        let mut engine = EngineBuilder::new()
            .with_window(HeadlessWindow::new(8, 8).with_frame_budget(2))
            .with_backend(backend)
            .with_scene(Scene::empty())
            .build()
            .unwrap();

        engine.run().unwrap();

        let frames: Vec<&str> = log
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Clear(_) => Some("clear"),
                Call::Present => Some("present"),
                _ => None,
            })
            .collect();
        assert_eq!(frames, vec!["clear", "present", "clear", "present"]);
    }

    #[test]
    fn scene_init_failure_aborts_run() {
        let mut engine = headless_engine(HeadlessWindow::new(1, 1).with_frame_budget(5));
        engine.set_scene(Scene::new(BrokenScene));

        assert!(engine.run().is_err());
        assert_eq!(engine.frame_count(), 0);
    }

    #[test]
    fn set_scene_returns_previous_scene() {
        let mut engine = headless_engine(HeadlessWindow::new(1, 1));
        assert!(engine.set_scene(Scene::empty()).is_none());
        assert!(engine.set_scene(Scene::empty()).is_some());
        assert!(engine.take_scene().is_some());
        assert!(engine.scene().is_none());
    }

    #[test]
    fn run_without_scene_still_counts_frames() {
        let mut engine = headless_engine(HeadlessWindow::new(1, 1).with_frame_budget(4));
        engine.run().unwrap();
        assert_eq!(engine.frame_count(), 4);
    }
}

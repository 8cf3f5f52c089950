//=========================================================================
// Scene System
//=========================================================================
//
// Ordered entity collection plus scene-global hooks.
//
// Architecture:
//   Scene
//     ├─ hooks: Box<dyn SceneHooks>   ← scene-global logic, runs first
//     ├─ entities: Entities           ← insertion order = frame order
//     └─ state: SceneState
//
// Flow (one frame):
//   dispatch_event() → hooks.on_event() → Entity::on_event()*
//   update(dt)       → hooks.on_update() → Entity::on_update()*
//   render(r)        → hooks.on_render() → Entity::on_render()* → r.flush()
//
// Inactive entities are skipped by all three passes.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::event::Event;
use crate::core::render::Renderer;
use crate::error::EngineError;

//=== Module Declarations =================================================

mod behavior;
mod entities;
mod entity;

//=== Public API ==========================================================

pub use behavior::{AsAny, Behavior, BehaviorTag};
pub use entities::Entities;
pub use entity::{Entity, EntityCore, EntityId};

//=== SceneHooks ==========================================================

/// Scene-global logic. Every hook runs before the entity pass it
/// precedes; all default to no-ops.
///
/// ```rust
/// # use orrery_engine::prelude::*;
/// struct Sandbox;
///
/// impl SceneHooks for Sandbox {
///     fn on_init(&mut self, entities: &mut Entities) -> Result<(), EngineError> {
///         entities.add(Entity::new("player"));
///         Ok(())
///     }
/// }
///
/// let mut scene = Scene::new(Sandbox);
/// scene.init().unwrap();
/// assert!(scene.get_entity("player").is_some());
/// ```
pub trait SceneHooks {
    /// Called once from `Scene::init`. Typically populates `entities`.
    fn on_init(&mut self, _entities: &mut Entities) -> Result<(), EngineError> {
        Ok(())
    }

    /// Called once from `Scene::shutdown`.
    fn on_shutdown(&mut self, _entities: &mut Entities) {}

    fn on_update(&mut self, _entities: &mut Entities, _dt: f32) {}

    /// Runs before traversal; the place to push camera, light and skybox
    /// state into the renderer.
    fn on_render(&mut self, _entities: &Entities, _renderer: &mut Renderer) {}

    /// Marking `event` handled here keeps it from every entity.
    fn on_event(&mut self, _entities: &mut Entities, _event: &mut Event) {}
}

/// Hooks for a scene that is nothing but its entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl SceneHooks for NoHooks {}

//=== SceneState ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Uninitialized,
    Running,
    Terminated,
}

//=== Scene ===============================================================

pub struct Scene {
    entities: Entities,
    hooks: Box<dyn SceneHooks>,
    state: SceneState,
}

impl Scene {
    pub fn new(hooks: impl SceneHooks + 'static) -> Self {
        Self {
            entities: Entities::default(),
            hooks: Box::new(hooks),
            state: SceneState::Uninitialized,
        }
    }

    /// A scene without scene-global logic.
    pub fn empty() -> Self {
        Self::new(NoHooks)
    }

    //--- Lifecycle --------------------------------------------------------

    /// Runs `on_init` and enters `Running`.
    ///
    /// Only the first call has an effect.
    ///
    /// # Errors
    ///
    /// Whatever the init hook returns; the scene stays uninitialized.
    pub fn init(&mut self) -> Result<(), EngineError> {
        if self.state != SceneState::Uninitialized {
            warn!(target: "scene", "Scene init requested in state {:?}, ignoring", self.state);
            return Ok(());
        }

        self.hooks.on_init(&mut self.entities)?;
        self.state = SceneState::Running;

        info!(target: "scene", "Scene initialized with {} entities", self.entities.len());
        Ok(())
    }

    /// Runs `on_shutdown` once, if the scene ever started.
    pub fn shutdown(&mut self) {
        if self.state != SceneState::Running {
            return;
        }

        self.hooks.on_shutdown(&mut self.entities);
        self.state = SceneState::Terminated;

        info!(target: "scene", "Scene shut down");
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    //--- Frame Passes -----------------------------------------------------

    pub fn update(&mut self, dt: f32) {
        self.hooks.on_update(&mut self.entities, dt);

        for entity in self.entities.iter_mut().filter(|e| e.is_active()) {
            entity.on_update(dt);
        }
    }

    /// Renders every active entity, then flushes the renderer once.
    pub fn render(&mut self, renderer: &mut Renderer) {
        self.hooks.on_render(&self.entities, renderer);

        for entity in self.entities.iter_mut().filter(|e| e.is_active()) {
            entity.on_render(renderer);
        }

        renderer.flush();
    }

    /// Offers `event` to the hooks, then to active entities in order.
    /// Forwarding stops as soon as the event is handled.
    pub fn dispatch_event(&mut self, event: &mut Event) {
        self.hooks.on_event(&mut self.entities, event);

        for entity in self.entities.iter_mut().filter(|e| e.is_active()) {
            if event.handled {
                break;
            }
            entity.on_event(event);
        }
    }

    //--- Entities ---------------------------------------------------------

    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.add(entity);
        debug!(target: "scene", "Added {} to scene", id);
        id
    }

    /// First entity named `name`, in insertion order.
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn get_entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.get_mut(name)
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut Entities {
        &mut self.entities
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("state", &self.state)
            .field("entities", &self.entities.len())
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
    use crate::core::event::{EventDispatcher, KeyCode, KeyPressed, WindowResize};
    use crate::core::render::testing::{flat_material, triangle_mesh, Call, RecordingBackend};
    use crate::core::render::{Camera, Model};
    use crate::error::BehaviorError;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Tracer {
        label: String,
        journal: Journal,
        claims: bool,
    }

    impl Behavior for Tracer {
        fn on_update(&mut self, _owner: &mut EntityCore, _dt: f32) {
            self.journal.borrow_mut().push(format!("{}:update", self.label));
        }

        fn on_render(&mut self, _owner: &EntityCore, _renderer: &mut Renderer) {
            self.journal.borrow_mut().push(format!("{}:render", self.label));
        }

        fn on_event(&mut self, _owner: &mut EntityCore, event: &mut Event) {
            self.journal.borrow_mut().push(format!("{}:event", self.label));
            let claims = self.claims;
            EventDispatcher::new(event).dispatch::<KeyPressed, _>(|_| claims);
        }
    }

    struct TracingHooks {
        journal: Journal,
        claim_events: bool,
    }

    impl SceneHooks for TracingHooks {
        fn on_init(&mut self, _entities: &mut Entities) -> Result<(), EngineError> {
            self.journal.borrow_mut().push("scene:init".into());
            Ok(())
        }

        fn on_shutdown(&mut self, _entities: &mut Entities) {
            self.journal.borrow_mut().push("scene:shutdown".into());
        }

        fn on_update(&mut self, _entities: &mut Entities, _dt: f32) {
            self.journal.borrow_mut().push("scene:update".into());
        }

        fn on_render(&mut self, _entities: &Entities, _renderer: &mut Renderer) {
            self.journal.borrow_mut().push("scene:render".into());
        }

        fn on_event(&mut self, _entities: &mut Entities, event: &mut Event) {
            self.journal.borrow_mut().push("scene:event".into());
            if self.claim_events {
                event.handled = true;
            }
        }
    }

    struct FailingHooks;

    impl SceneHooks for FailingHooks {
        fn on_init(&mut self, _entities: &mut Entities) -> Result<(), EngineError> {
            Err(BehaviorError::Other("no assets".into()).into())
        }
    }

    fn traced_scene(labels: &[&str], journal: &Journal) -> Scene {
        let mut scene = Scene::new(TracingHooks { journal: Rc::clone(journal), claim_events: false });
        for label in labels {
            scene.add_entity(traced_entity(label, journal, false));
        }
        scene
    }

    fn traced_entity(label: &str, journal: &Journal, claims: bool) -> Entity {
        let mut entity = Entity::new(label);
        entity
            .add_behavior(Tracer { label: label.to_owned(), journal: Rc::clone(journal), claims })
            .unwrap();
        entity
    }

    fn key_event() -> Event {
        Event::new(KeyPressed { key: KeyCode::Enter, repeat_count: 0 })
    }

    fn take(journal: &Journal) -> Vec<String> {
        std::mem::take(&mut *journal.borrow_mut())
    }

    #[test]
    fn update_runs_hook_then_entities_in_order() {
        let journal = Journal::default();
        let mut scene = traced_scene(&["a", "b", "c"], &journal);

        scene.update(0.016);

        assert_eq!(take(&journal), vec!["scene:update", "a:update", "b:update", "c:update"]);
    }

    #[test]
    fn reordering_entities_reorders_callbacks() {
        let journal = Journal::default();
        let mut scene = traced_scene(&["c", "a", "b"], &journal);

        scene.update(0.016);

        assert_eq!(take(&journal), vec!["scene:update", "c:update", "a:update", "b:update"]);
    }

    #[test]
    fn render_runs_hook_then_entities_then_flushes_once() {
        let journal = Journal::default();
        let mut scene = traced_scene(&["a", "b"], &journal);
        let model = Rc::new(Model::new(triangle_mesh(), flat_material("m")));
        for entity in scene.entities_mut().iter_mut() {
            entity.set_model(Rc::clone(&model));
        }

        let backend = RecordingBackend::new();
        let log = backend.log();
        let mut renderer = Renderer::new(Box::new(backend));
        renderer.set_camera(Some(Camera::default().into_shared()));

        scene.render(&mut renderer);

        assert_eq!(take(&journal), vec!["scene:render", "a:render", "b:render"]);
        assert_eq!(renderer.queue_len(), 0);
        assert_eq!(renderer.draws_in_last_flush(), 2);
        let draws = log.borrow().iter().filter(|c| matches!(c, Call::DrawIndexed(_))).count();
        assert_eq!(draws, 2);
    }

    #[test]
    fn reordering_entities_reorders_draws() {
        let journal = Journal::default();
        let mut scene = traced_scene(&["c", "a", "b"], &journal);
        let mesh = triangle_mesh();
        for entity in scene.entities_mut().iter_mut() {
            let material = flat_material(&format!("{}-material", entity.name()));
            entity.set_model(Rc::new(Model::new(Rc::clone(&mesh), material)));
        }

        let backend = RecordingBackend::new();
        let log = backend.log();
        let mut renderer = Renderer::new(Box::new(backend));
        renderer.set_camera(Some(Camera::default().into_shared()));

        scene.render(&mut renderer);

        let shaders: Vec<String> = log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::UseShader(name) => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(shaders, vec!["c-material", "a-material", "b-material"]);
        assert_eq!(take(&journal), vec!["scene:render", "c:render", "a:render", "b:render"]);
    }

    #[test]
    fn inactive_entities_are_skipped_everywhere() {
        let journal = Journal::default();
        let mut scene = traced_scene(&["a", "b"], &journal);
        scene.get_entity_mut("a").unwrap().set_active(false);

        let mut renderer = Renderer::new(Box::new(RecordingBackend::new()));
        scene.update(0.016);
        scene.render(&mut renderer);
        scene.dispatch_event(&mut key_event());

        assert_eq!(
            take(&journal),
            vec!["scene:update", "b:update", "scene:render", "b:render", "scene:event", "b:event"]
        );
    }

    #[test]
    fn handled_event_stops_at_the_claiming_entity() {
        let journal = Journal::default();
        let mut scene = traced_scene(&["a"], &journal);
        scene.add_entity(traced_entity("b", &journal, true));
        scene.add_entity(traced_entity("c", &journal, false));

        let mut event = key_event();
        scene.dispatch_event(&mut event);

        assert!(event.handled);
        assert_eq!(take(&journal), vec!["scene:event", "a:event", "b:event"]);
    }

    #[test]
    fn scene_hook_claim_hides_event_from_entities() {
        let journal = Journal::default();
        let mut scene = Scene::new(TracingHooks { journal: Rc::clone(&journal), claim_events: true });
        scene.add_entity(traced_entity("a", &journal, false));

        let mut event = key_event();
        scene.dispatch_event(&mut event);

        assert!(event.handled);
        assert_eq!(take(&journal), vec!["scene:event"]);
    }

    #[test]
    fn unclaimed_event_reaches_every_entity() {
        let journal = Journal::default();
        let mut scene = traced_scene(&["a", "b"], &journal);

        let mut event = Event::new(WindowResize { width: 10, height: 10 });
        scene.dispatch_event(&mut event);

        assert!(!event.handled);
        assert_eq!(take(&journal), vec!["scene:event", "a:event", "b:event"]);
    }

    #[test]
    fn lifecycle_hooks_run_once() {
        let journal = Journal::default();
        let mut scene = traced_scene(&[], &journal);
        assert_eq!(scene.state(), SceneState::Uninitialized);

        scene.init().unwrap();
        scene.init().unwrap();
        assert_eq!(scene.state(), SceneState::Running);

        scene.shutdown();
        scene.shutdown();
        assert_eq!(scene.state(), SceneState::Terminated);

        assert_eq!(take(&journal), vec!["scene:init", "scene:shutdown"]);
    }

    #[test]
    fn failed_init_leaves_scene_uninitialized() {
        let mut scene = Scene::new(FailingHooks);
        assert!(scene.init().is_err());
        assert_eq!(scene.state(), SceneState::Uninitialized);

        // Never started, so nothing to shut down.
        scene.shutdown();
        assert_eq!(scene.state(), SceneState::Uninitialized);
    }

    #[test]
    fn entity_lookup_by_name() {
        let mut scene = Scene::empty();
        let id = scene.add_entity(Entity::new("sun"));
        scene.add_entity(Entity::new("earth"));

        assert_eq!(scene.get_entity("sun").map(Entity::id), Some(id));
        assert!(scene.get_entity("moon").is_none());
        assert_eq!(scene.entities().len(), 2);
    }
}

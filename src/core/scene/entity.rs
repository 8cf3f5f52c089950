//=========================================================================
// Entity
//=========================================================================
//
// Named, transform-bearing container for an optional model and an ordered
// list of behaviors.
//
// The entity is split in two so behaviors can borrow their owner mutably
// while the entity iterates its behavior list:
// ```text
// Entity
// ├── core: EntityCore        ← passed into every hook
// └── behaviors: Vec<BehaviorSlot>
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Quat, Vec3};
use log::debug;

//=== Internal Dependencies ===============================================

use super::{Behavior, BehaviorTag};
use crate::core::event::Event;
use crate::core::math::Transform;
use crate::core::render::{Model, Renderer, SharedCamera};
use crate::error::BehaviorError;

//=== EntityId ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

//=== EntityCore ==========================================================

/// Everything about an entity except its behaviors.
#[derive(Debug)]
pub struct EntityCore {
    id: EntityId,
    name: String,
    active: bool,
    pub transform: Transform,
    model: Option<Rc<Model>>,
    camera: Option<SharedCamera>,
}

impl EntityCore {
    fn new(name: String) -> Self {
        Self {
            id: EntityId::next(),
            name,
            active: true,
            transform: Transform::default(),
            model: None,
            camera: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn model(&self) -> Option<&Rc<Model>> {
        self.model.as_ref()
    }

    pub fn set_model(&mut self, model: Option<Rc<Model>>) {
        self.model = model;
    }

    /// Camera carried by this entity, if it is a camera entity.
    pub fn camera(&self) -> Option<&SharedCamera> {
        self.camera.as_ref()
    }

    pub fn set_camera(&mut self, camera: Option<SharedCamera>) {
        self.camera = camera;
    }
}

//=== BehaviorSlot ========================================================

struct BehaviorSlot {
    tag: BehaviorTag,
    owner: EntityId,
    behavior: Box<dyn Behavior>,
}

impl BehaviorSlot {
    fn downcast_ref<T: Behavior>(&self) -> Option<&T> {
        if !self.tag.is::<T>() {
            return None;
        }
        (*self.behavior).as_any().downcast_ref::<T>()
    }

    fn downcast_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        if !self.tag.is::<T>() {
            return None;
        }
        (*self.behavior).as_any_mut().downcast_mut::<T>()
    }
}

//=== Entity ==============================================================

pub struct Entity {
    core: EntityCore,
    behaviors: Vec<BehaviorSlot>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: EntityCore::new(name.into()),
            behaviors: Vec::new(),
        }
    }

    //--- Behaviors --------------------------------------------------------

    /// Binds `behavior` to this entity, runs its `on_init`, then appends
    /// it. Returns the attached instance.
    ///
    /// # Errors
    ///
    /// Whatever `on_init` returns. The behavior is not attached in that
    /// case.
    pub fn add_behavior<T: Behavior>(&mut self, behavior: T) -> Result<&mut T, BehaviorError> {
        let tag = BehaviorTag::of::<T>();
        let mut slot = BehaviorSlot {
            tag,
            owner: self.core.id,
            behavior: Box::new(behavior),
        };

        slot.behavior.on_init(&mut self.core)?;

        debug!(target: "scene", "Attached {} to '{}' ({})", tag, self.core.name, slot.owner);

        let index = self.behaviors.len();
        self.behaviors.push(slot);
        self.behaviors[index]
            .downcast_mut::<T>()
            .ok_or_else(|| BehaviorError::Other(format!("{tag} changed type while attaching")))
    }

    /// First attached behavior of type `T`, in attachment order.
    pub fn get_behavior<T: Behavior>(&self) -> Option<&T> {
        self.behaviors.iter().find_map(BehaviorSlot::downcast_ref::<T>)
    }

    pub fn get_behavior_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        self.behaviors.iter_mut().find_map(BehaviorSlot::downcast_mut::<T>)
    }

    pub fn has_behavior<T: Behavior>(&self) -> bool {
        self.behaviors.iter().any(|slot| slot.tag.is::<T>())
    }

    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// Tags of attached behaviors in attachment order.
    pub fn behavior_tags(&self) -> impl Iterator<Item = BehaviorTag> + '_ {
        self.behaviors.iter().map(|slot| slot.tag)
    }

    //--- Lifecycle --------------------------------------------------------

    /// Updates every behavior in attachment order.
    pub fn on_update(&mut self, dt: f32) {
        for slot in &mut self.behaviors {
            slot.behavior.on_update(&mut self.core, dt);
        }
    }

    /// Submits the model at this entity's world matrix, then lets the
    /// behaviors render.
    pub fn on_render(&mut self, renderer: &mut Renderer) {
        if let Some(model) = &self.core.model {
            model.render(renderer, self.core.transform.model_matrix());
        }

        for slot in &mut self.behaviors {
            slot.behavior.on_render(&self.core, renderer);
        }
    }

    /// Offers `event` to each behavior until one marks it handled.
    pub fn on_event(&mut self, event: &mut Event) {
        for slot in &mut self.behaviors {
            if event.handled {
                break;
            }
            slot.behavior.on_event(&mut self.core, event);
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn core(&self) -> &EntityCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    pub fn id(&self) -> EntityId {
        self.core.id
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn is_active(&self) -> bool {
        self.core.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.core.active = active;
    }

    pub fn transform(&self) -> &Transform {
        &self.core.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.core.transform
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.core.transform.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.core.transform.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.core.transform.scale = scale;
    }

    pub fn model(&self) -> Option<&Rc<Model>> {
        self.core.model()
    }

    pub fn set_model(&mut self, model: Rc<Model>) {
        self.core.model = Some(model);
    }

    pub fn camera(&self) -> Option<&SharedCamera> {
        self.core.camera()
    }

    pub fn set_camera(&mut self, camera: SharedCamera) {
        self.core.camera = Some(camera);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("core", &self.core)
            .field("behaviors", &self.behavior_tags().collect::<Vec<_>>())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

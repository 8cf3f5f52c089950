//=========================================================================
// Behavior
//=========================================================================
//
// Per-entity logic with opt-in lifecycle hooks.
//
// Every hook receives its owner explicitly (`&EntityCore` or
// `&mut EntityCore`), so a behavior never stores a pointer back to its
// entity and can never observe a missing owner.
//
//=========================================================================

use std::any::{self, Any, TypeId};
use std::fmt;

use crate::core::event::Event;
use crate::core::render::Renderer;
use crate::core::scene::EntityCore;
use crate::error::BehaviorError;

//=== AsAny ===============================================================

/// Upcast helper so `dyn Behavior` can be narrowed after a tag match.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Behavior ============================================================

/// Attachable unit of entity logic. All hooks default to no-ops.
///
/// Hooks run in attachment order. `on_event` stops at the first behavior
/// that marks the event handled.
pub trait Behavior: AsAny {
    /// Runs once when attached, with the owner fully wired.
    ///
    /// Returning an error aborts the attachment: the behavior is dropped
    /// and never receives another hook.
    fn on_init(&mut self, _owner: &mut EntityCore) -> Result<(), BehaviorError> {
        Ok(())
    }

    fn on_update(&mut self, _owner: &mut EntityCore, _dt: f32) {}

    /// Runs after the owner's model was submitted.
    fn on_render(&mut self, _owner: &EntityCore, _renderer: &mut Renderer) {}

    fn on_event(&mut self, _owner: &mut EntityCore, _event: &mut Event) {}
}

//=== BehaviorTag =========================================================

/// Stable identity of a concrete behavior type, captured at attach time.
#[derive(Clone, Copy)]
pub struct BehaviorTag {
    id: TypeId,
    name: &'static str,
}

impl BehaviorTag {
    pub fn of<T: Behavior>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    pub fn is<T: Behavior>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for BehaviorTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BehaviorTag {}

impl fmt::Debug for BehaviorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BehaviorTag({})", self.name)
    }
}

impl fmt::Display for BehaviorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Spin;
    impl Behavior for Spin {}

    struct Bob;
    impl Behavior for Bob {}

    #[test]
    fn tags_distinguish_types() {
        assert_eq!(BehaviorTag::of::<Spin>(), BehaviorTag::of::<Spin>());
        assert_ne!(BehaviorTag::of::<Spin>(), BehaviorTag::of::<Bob>());
        assert!(BehaviorTag::of::<Bob>().is::<Bob>());
    }

    #[test]
    fn short_name_drops_module_path() {
        let tag = BehaviorTag::of::<Spin>();
        assert_eq!(tag.short_name(), "Spin");
        assert!(tag.name().ends_with("::Spin"));
        assert_eq!(tag.to_string(), "Spin");
    }
}

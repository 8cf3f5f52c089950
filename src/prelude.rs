//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use orrery_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineState};
pub use crate::error::{BehaviorError, EngineError};

// Events
pub use crate::core::event::{Event, EventDispatcher, KeyCode, MouseButton};

// Math
pub use crate::core::math::Transform;
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Rendering
pub use crate::core::render::{
    Camera, Light, LightType, Material, Mesh, Model, Renderer, SharedCamera, Shader, Texture,
};

// Scene system
pub use crate::core::scene::{Behavior, Entities, Entity, EntityCore, Scene, SceneHooks};

// Built-in behaviors
pub use crate::behaviors::{apply_mutual_attraction, CameraOrbitBehavior, GravityBehavior};

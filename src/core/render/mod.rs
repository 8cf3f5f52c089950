//=========================================================================
// Render
//=========================================================================
//
// Command-queue renderer and the resource handles it draws with.
//
// Scene traversal submits (mesh, material, world matrix) commands; one
// flush per frame resolves camera/light/uniform state and hands each
// command to the active `RenderBackend`.
//
//=========================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod camera;
mod light;
mod material;
mod mesh;
mod model;
mod renderer;
mod shader;
mod texture;

pub use backend::{BackendStats, HeadlessBackend, RenderBackend, Uniform};
pub use camera::{Camera, SharedCamera};
pub use light::{Light, LightType};
pub use material::Material;
pub use mesh::{Mesh, Vertex};
pub use model::Model;
pub use renderer::{RenderCommand, Renderer};
pub use shader::Shader;
pub use texture::{Texture, TextureKind};

//=== ResourceId ==========================================================

/// Process-unique handle identity; backends key their GPU caches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== Test Support ========================================================

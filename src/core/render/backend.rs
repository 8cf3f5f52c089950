//=========================================================================
// Render Backend
//=========================================================================
//
// The seam between the renderer's command queue and an actual graphics
// API. The renderer decides *what* is drawn and in which order; a backend
// only executes the primitive operations below.
//
// Per queued command the renderer issues, in order:
// ```text
// use_shader → set_uniform("color") → bind_texture/set_uniform per texture
//            → bind_texture(skybox) → set_uniform(custom...)
//            → set_uniform(projection/view/model/viewPos)
//            → set_uniform(light...) → bind_mesh → draw_indexed → unbind_mesh
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Vec3, Vec4};
use log::trace;

//=== Internal Dependencies ===============================================

use super::{Mesh, Shader, Texture};
use crate::error::ResourceError;

//=== Uniform =============================================================

/// A uniform value addressed by name on a shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl From<f32> for Uniform {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Vec3> for Uniform {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Vec4> for Uniform {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

//=== RenderBackend =======================================================

/// Graphics API adapter used by [`Renderer`](super::Renderer).
///
/// Only `initialize` and `compile_shader` can fail; they run at startup.
/// Everything called from `Renderer::flush` is infallible by contract, a
/// backend that hits a runtime problem logs it and carries on.
pub trait RenderBackend {
    /// One-time setup (context loading, default pipeline state).
    fn initialize(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Compiles and links `shader` ahead of its first use.
    fn compile_shader(&mut self, _shader: &Shader) -> Result<(), ResourceError> {
        Ok(())
    }

    fn clear(&mut self, color: Vec4);

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    fn use_shader(&mut self, shader: &Shader);

    fn set_uniform(&mut self, shader: &Shader, name: &str, value: Uniform);

    fn bind_texture(&mut self, texture: &Texture, unit: u32);

    fn bind_mesh(&mut self, mesh: &Mesh);

    fn draw_indexed(&mut self, index_count: u32);

    fn unbind_mesh(&mut self, mesh: &Mesh);

    /// End-of-frame hook (post-processing, resolve).
    fn present(&mut self) {}
}

//=== HeadlessBackend =====================================================

/// Running totals kept by [`HeadlessBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendStats {
    pub frames: u64,
    pub draw_calls: u64,
    pub indices: u64,
    pub uniforms_set: u64,
}

/// Backend that executes nothing and only counts.
///
/// Used when no graphics API is wired in: CI, simulation-only runs, and
/// the engine's own tests.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    stats: BackendStats,
    viewport: (i32, i32, u32, u32),
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> BackendStats {
        self.stats
    }

    pub fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }
}

impl RenderBackend for HeadlessBackend {
    /// Nothing to compile, but a stage with no source would never link.
    fn compile_shader(&mut self, shader: &Shader) -> Result<(), ResourceError> {
        let empty_stage = if shader.vertex_source().trim().is_empty() {
            Some("vertex")
        } else if shader.fragment_source().trim().is_empty() {
            Some("fragment")
        } else {
            None
        };

        match empty_stage {
            Some(stage) => Err(ResourceError::ShaderCompile {
                name: shader.name().to_owned(),
                message: format!("{} stage is empty", stage),
            }),
            None => Ok(()),
        }
    }

    fn clear(&mut self, _color: Vec4) {}

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
    }

    fn use_shader(&mut self, shader: &Shader) {
        trace!(target: "renderer::headless", "use shader '{}'", shader.name());
    }

    fn set_uniform(&mut self, _shader: &Shader, _name: &str, _value: Uniform) {
        self.stats.uniforms_set += 1;
    }

    fn bind_texture(&mut self, _texture: &Texture, _unit: u32) {}

    fn bind_mesh(&mut self, _mesh: &Mesh) {}

    fn draw_indexed(&mut self, index_count: u32) {
        self.stats.draw_calls += 1;
        self.stats.indices += u64::from(index_count);
    }

    fn unbind_mesh(&mut self, _mesh: &Mesh) {}

    fn present(&mut self) {
        self.stats.frames += 1;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_backend_counts_draws_and_frames() {
        let mut backend = HeadlessBackend::new();
        backend.draw_indexed(36);
        backend.draw_indexed(6);
        backend.present();

        let stats = backend.stats();
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.indices, 42);
        assert_eq!(stats.frames, 1);
    }

    #[test]
    fn headless_backend_tracks_viewport() {
        let mut backend = HeadlessBackend::new();
        backend.set_viewport(0, 0, 640, 480);
        assert_eq!(backend.viewport(), (0, 0, 640, 480));
    }

    #[test]
    fn headless_backend_rejects_empty_shader_stage() {
        let mut backend = HeadlessBackend::new();
        let good = Shader::from_source("lit", "void main() {}", "void main() {}");
        let hollow = Shader::from_source("hollow", "void main() {}", "  ");

        assert!(backend.compile_shader(&good).is_ok());
        match backend.compile_shader(&hollow) {
            Err(ResourceError::ShaderCompile { name, message }) => {
                assert_eq!(name, "hollow");
                assert!(message.contains("fragment"), "message was {message}");
            }
            other => panic!("expected ShaderCompile, got {:?}", other),
        }
    }

    #[test]
    fn uniform_conversions() {
        assert_eq!(Uniform::from(0.5_f32), Uniform::Float(0.5));
        assert_eq!(Uniform::from(Vec3::ONE), Uniform::Vec3(Vec3::ONE));
    }
}

//=========================================================================
// Material
//=========================================================================

use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec4;

use super::{RenderBackend, Shader, Texture, Uniform};

/// Shader + base color + named texture slots.
///
/// Textures are bound to consecutive units in name order, so the unit a
/// sampler ends up on is stable across frames.
#[derive(Debug, Clone)]
pub struct Material {
    shader: Rc<Shader>,
    color: Vec4,
    textures: BTreeMap<String, Rc<Texture>>,
}

impl Material {
    pub fn new(shader: Rc<Shader>) -> Self {
        Self {
            shader,
            color: Vec4::ONE,
            textures: BTreeMap::new(),
        }
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn shader(&self) -> &Rc<Shader> {
        &self.shader
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    /// Assigns `texture` to the sampler uniform `name`, replacing any
    /// previous texture under that name.
    pub fn set_texture(&mut self, name: impl Into<String>, texture: Rc<Texture>) {
        self.textures.insert(name.into(), texture);
    }

    pub fn texture(&self, name: &str) -> Option<&Rc<Texture>> {
        self.textures.get(name)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Activates the shader, pushes `color`, and binds every texture.
    ///
    /// Returns the number of texture units consumed; the next free unit is
    /// the return value.
    pub fn bind(&self, backend: &mut dyn RenderBackend) -> u32 {
        let shader = self.shader.as_ref();
        backend.use_shader(shader);
        backend.set_uniform(shader, "color", Uniform::Vec4(self.color));

        let mut unit = 0u32;
        for (name, texture) in &self.textures {
            backend.bind_texture(texture, unit);
            backend.set_uniform(shader, "hasTexture", Uniform::Bool(true));
            backend.set_uniform(shader, name, Uniform::Int(unit as i32));
            unit += 1;
        }
        unit
    }
}

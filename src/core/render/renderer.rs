//=========================================================================
// Renderer
//=========================================================================
//
// Frame-scoped command queue in front of a `RenderBackend`.
//
// Frame protocol (driven by the engine):
// ```text
// clear() → [scene traversal: submit_mesh()*] → flush() → present()
// ```
//
// Submissions are drawn strictly in the order they arrive; nothing is
// sorted. `flush` always leaves the queue empty, with or without a camera.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::mem;
use std::rc::Rc;

use glam::{Mat4, Vec3, Vec4};
use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::{Light, Material, Mesh, RenderBackend, SharedCamera, Texture, Uniform};
use crate::config::RendererConfig;
use crate::core::math::Transform;
use crate::error::{EngineError, ResourceError};

//=== RenderCommand =======================================================

/// One queued draw. Lives from submission until the next flush.
#[derive(Debug, Clone)]
pub struct RenderCommand {
    pub mesh: Rc<Mesh>,
    pub material: Rc<Material>,
    pub model_matrix: Mat4,
}

//=== Renderer ============================================================

pub struct Renderer {
    backend: Box<dyn RenderBackend>,
    queue: Vec<RenderCommand>,

    camera: Option<SharedCamera>,
    light_position: Vec3,
    light_color: Vec3,
    light_intensity: f32,
    ambient_strength: f32,

    skybox: Option<Rc<Texture>>,
    custom_uniforms: BTreeMap<String, Uniform>,

    clear_color: Vec4,
    viewport: (i32, i32, u32, u32),
    last_flush_draws: usize,
}

impl Renderer {
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self::with_config(backend, &RendererConfig::default())
    }

    /// Seeds clear color, ambient and light state from `config`.
    pub fn with_config(backend: Box<dyn RenderBackend>, config: &RendererConfig) -> Self {
        Self {
            backend,
            queue: Vec::new(),
            camera: None,
            light_position: config.light_position(),
            light_color: config.light_color(),
            light_intensity: config.light_intensity,
            ambient_strength: config.ambient_strength,
            skybox: None,
            custom_uniforms: BTreeMap::new(),
            clear_color: config.clear_color(),
            viewport: (0, 0, 0, 0),
            last_flush_draws: 0,
        }
    }

    /// Forwards to the backend's one-time setup.
    ///
    /// # Errors
    ///
    /// [`EngineError::Render`] when the backend cannot initialize.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.backend.initialize().map_err(EngineError::Render)?;
        debug!(target: "renderer", "Renderer initialized");
        Ok(())
    }

    /// Compiles the material's shader ahead of the first frame.
    pub fn prepare_material(&mut self, material: &Material) -> Result<(), ResourceError> {
        self.backend.compile_shader(material.shader())
    }

    //--- Frame Protocol ---------------------------------------------------

    /// Starts a frame: clears the framebuffer to the configured color.
    ///
    /// Commands still queued here were submitted outside a frame; they are
    /// dropped so traversal starts on an empty queue.
    pub fn clear(&mut self) {
        if !self.queue.is_empty() {
            warn!(target: "renderer",
                "Discarding {} render command(s) submitted outside a frame",
                self.queue.len());
            self.queue.clear();
        }
        self.backend.clear(self.clear_color);
    }

    /// Queues a draw. Dropped silently when either resource is missing.
    pub fn submit_mesh(
        &mut self,
        mesh: Option<Rc<Mesh>>,
        material: Option<Rc<Material>>,
        model_matrix: Mat4,
    ) {
        let (Some(mesh), Some(material)) = (mesh, material) else {
            trace!(target: "renderer", "Dropped submission without mesh or material");
            return;
        };

        self.queue.push(RenderCommand { mesh, material, model_matrix });
    }

    /// Draws every queued command in submission order, then empties the
    /// queue. Without a camera nothing is drawn.
    pub fn flush(&mut self) {
        let mut queue = mem::take(&mut self.queue);

        let view_state = self.camera.as_ref().map(|camera| {
            let camera = camera.borrow();
            (camera.projection_matrix(), camera.view_matrix(), camera.position())
        });

        self.last_flush_draws = match view_state {
            Some((projection, view, view_position)) => {
                for command in &queue {
                    self.draw(command, projection, view, view_position);
                }
                queue.len()
            }
            None => {
                if !queue.is_empty() {
                    trace!(target: "renderer",
                        "No camera bound, skipping {} command(s)", queue.len());
                }
                0
            }
        };

        trace!(target: "renderer", "Flushed {} draw(s)", self.last_flush_draws);

        // Hand the allocation back for the next frame.
        queue.clear();
        self.queue = queue;
    }

    pub fn present(&mut self) {
        self.backend.present();
    }

    //--- Global State -----------------------------------------------------

    pub fn set_camera(&mut self, camera: Option<SharedCamera>) {
        self.camera = camera;
    }

    pub fn camera(&self) -> Option<&SharedCamera> {
        self.camera.as_ref()
    }

    /// Takes position, color and intensity from `light`; position and
    /// direction resolve against `owner` when given.
    pub fn set_light(&mut self, light: &Light, owner: Option<&Transform>) {
        self.light_position = light.world_position(owner);
        self.light_color = light.color();
        self.light_intensity = light.intensity();
    }

    pub fn set_light_position(&mut self, position: Vec3) {
        self.light_position = position;
    }

    pub fn set_light_color(&mut self, color: Vec3) {
        self.light_color = color;
    }

    pub fn set_light_intensity(&mut self, intensity: f32) {
        self.light_intensity = intensity;
    }

    pub fn set_ambient_strength(&mut self, strength: f32) {
        self.ambient_strength = strength;
    }

    pub fn light_position(&self) -> Vec3 {
        self.light_position
    }

    pub fn light_color(&self) -> Vec3 {
        self.light_color
    }

    pub fn light_intensity(&self) -> f32 {
        self.light_intensity
    }

    pub fn ambient_strength(&self) -> f32 {
        self.ambient_strength
    }

    pub fn set_skybox_texture(&mut self, texture: Option<Rc<Texture>>) {
        self.skybox = texture;
    }

    /// Sets a uniform pushed with every draw until replaced or removed.
    pub fn set_custom_uniform(&mut self, name: impl Into<String>, value: impl Into<Uniform>) {
        self.custom_uniforms.insert(name.into(), value.into());
    }

    pub fn set_custom_vec3_uniform(&mut self, name: impl Into<String>, value: Vec3) {
        self.set_custom_uniform(name, Uniform::Vec3(value));
    }

    pub fn remove_custom_uniform(&mut self, name: &str) -> Option<Uniform> {
        self.custom_uniforms.remove(name)
    }

    pub fn custom_uniform(&self, name: &str) -> Option<Uniform> {
        self.custom_uniforms.get(name).copied()
    }

    pub fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        debug!(target: "renderer", "Viewport set to {}x{} at ({}, {})", width, height, x, y);
        self.viewport = (x, y, width, height);
        self.backend.set_viewport(x, y, width, height);
    }

    pub fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    //--- Stats ------------------------------------------------------------

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn draws_in_last_flush(&self) -> usize {
        self.last_flush_draws
    }

    //--- Internal Helpers -------------------------------------------------

    fn draw(&mut self, command: &RenderCommand, projection: Mat4, view: Mat4, view_position: Vec3) {
        let backend = self.backend.as_mut();
        let shader = command.material.shader().as_ref();

        let next_unit = command.material.bind(backend);

        if let Some(skybox) = &self.skybox {
            backend.bind_texture(skybox, next_unit);
            backend.set_uniform(shader, "skybox", Uniform::Int(next_unit as i32));
        }

        for (name, value) in &self.custom_uniforms {
            backend.set_uniform(shader, name, *value);
        }

        backend.set_uniform(shader, "projection", Uniform::Mat4(projection));
        backend.set_uniform(shader, "view", Uniform::Mat4(view));
        backend.set_uniform(shader, "model", Uniform::Mat4(command.model_matrix));
        backend.set_uniform(shader, "viewPos", Uniform::Vec3(view_position));

        backend.set_uniform(shader, "lightPos", Uniform::Vec3(self.light_position));
        backend.set_uniform(shader, "lightColor", Uniform::Vec3(self.light_color));
        backend.set_uniform(shader, "lightIntensity", Uniform::Float(self.light_intensity));
        backend.set_uniform(shader, "ambientStrength", Uniform::Float(self.ambient_strength));

        backend.bind_mesh(&command.mesh);
        backend.draw_indexed(command.mesh.index_count());
        backend.unbind_mesh(&command.mesh);
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("queued", &self.queue.len())
            .field("has_camera", &self.camera.is_some())
            .field("light_position", &self.light_position)
            .field("custom_uniforms", &self.custom_uniforms.len())
            .field("last_flush_draws", &self.last_flush_draws)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

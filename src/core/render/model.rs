//=========================================================================
// Model
//=========================================================================

use std::rc::Rc;

use glam::{Mat4, Vec3};

use super::{Material, Mesh, Renderer};
use crate::core::math::Transform;

/// Mesh + material pair with its own local transform.
///
/// Usually shared (`Rc<Model>`) by every entity that looks the same; each
/// entity supplies its world matrix as the parent at render time.
#[derive(Debug, Clone)]
pub struct Model {
    mesh: Option<Rc<Mesh>>,
    material: Option<Rc<Material>>,
    transform: Transform,
}

impl Model {
    pub fn new(mesh: Rc<Mesh>, material: Rc<Material>) -> Self {
        Self {
            mesh: Some(mesh),
            material: Some(material),
            transform: Transform::default(),
        }
    }

    /// A model missing its mesh or material renders nothing.
    pub fn from_parts(mesh: Option<Rc<Mesh>>, material: Option<Rc<Material>>) -> Self {
        Self {
            mesh,
            material,
            transform: Transform::default(),
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn mesh(&self) -> Option<&Rc<Mesh>> {
        self.mesh.as_ref()
    }

    pub fn material(&self) -> Option<&Rc<Material>> {
        self.material.as_ref()
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.model_matrix()
    }

    /// Queues one draw at `parent * local`.
    pub fn render(&self, renderer: &mut Renderer, parent: Mat4) {
        let (Some(mesh), Some(material)) = (&self.mesh, &self.material) else {
            return;
        };

        renderer.submit_mesh(
            Some(Rc::clone(mesh)),
            Some(Rc::clone(material)),
            parent * self.model_matrix(),
        );
    }
}

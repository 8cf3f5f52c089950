//=========================================================================
// Mesh
//=========================================================================
//
// Indexed triangle list. The backend uploads vertex/index buffers on first
// bind and caches them by `ResourceId`.
//
//=========================================================================

use glam::{Vec2, Vec3};

use super::ResourceId;
use crate::error::ResourceError;

/// Interleaved vertex layout: position, normal, texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self { position, normal, tex_coord }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    id: ResourceId,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    /// # Errors
    ///
    /// [`ResourceError::IndexOutOfRange`] if any index does not address a
    /// vertex.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, ResourceError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(ResourceError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self {
            id: ResourceId::next(),
            vertices,
            indices,
        })
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vertex> {
        vec![
            Vertex::new(Vec3::ZERO, Vec3::Z, Vec2::ZERO),
            Vertex::new(Vec3::X, Vec3::Z, Vec2::X),
            Vertex::new(Vec3::Y, Vec3::Z, Vec2::Y),
        ]
    }

    #[test]
    fn valid_mesh_reports_index_count() {
        let mesh = Mesh::new(triangle(), vec![0, 1, 2]).unwrap();
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.vertices().len(), 3);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = Mesh::new(triangle(), vec![0, 1, 3]).unwrap_err();
        assert!(matches!(err, ResourceError::IndexOutOfRange { index: 3, vertex_count: 3 }));
    }
}

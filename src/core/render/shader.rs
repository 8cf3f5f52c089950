//=========================================================================
// Shader
//=========================================================================
//
// Named vertex/fragment source pair. Compilation and uniform upload are
// the backend's business: the renderer only ever addresses a shader by
// identity and sets uniforms on it by name.
//
//=========================================================================

use std::path::Path;

use log::debug;

use super::ResourceId;
use crate::error::ResourceError;

/// Shader program sources plus a stable identity for the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    id: ResourceId,
    name: String,
    vertex_source: String,
    fragment_source: String,
}

impl Shader {
    pub fn from_source(
        name: impl Into<String>,
        vertex_source: impl Into<String>,
        fragment_source: impl Into<String>,
    ) -> Self {
        Self {
            id: ResourceId::next(),
            name: name.into(),
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
        }
    }

    /// Reads both stages from disk. The shader is named after the
    /// fragment file stem.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Io`] if either file cannot be read.
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ResourceError> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();

        let vertex_source = read_source(vertex_path)?;
        let fragment_source = read_source(fragment_path)?;

        let name = fragment_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| fragment_path.display().to_string());

        debug!(target: "renderer", "Loaded shader '{}' from {} + {}",
            name, vertex_path.display(), fragment_path.display());

        Ok(Self::from_source(name, vertex_source, fragment_source))
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }
}

fn read_source(path: &Path) -> Result<String, ResourceError> {
    std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

//=========================================================================
// Texture
//=========================================================================

use std::path::{Path, PathBuf};

use super::ResourceId;
use crate::error::ResourceError;

/// How the backend should sample the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Texture2D,
    Cubemap,
}

/// Opaque texture handle. Pixel decoding and upload happen in the backend,
/// keyed by [`Texture::id`] and, for file-backed textures, [`Texture::path`].
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    id: ResourceId,
    name: String,
    kind: TextureKind,
    path: Option<PathBuf>,
}

impl Texture {
    /// Creates a texture with no backing file (render targets, generated
    /// data).
    pub fn new(name: impl Into<String>, kind: TextureKind) -> Self {
        Self {
            id: ResourceId::next(),
            name: name.into(),
            kind,
            path: None,
        }
    }

    /// Creates a file-backed texture.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Io`] if the file does not exist or is unreadable.
    pub fn from_file(path: impl AsRef<Path>, kind: TextureKind) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        std::fs::File::open(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            id: ResourceId::next(),
            name,
            kind,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_file_records_path_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ground.jpg");
        std::fs::write(&file, [0u8; 4]).unwrap();

        let texture = Texture::from_file(&file, TextureKind::Texture2D).unwrap();

        assert_eq!(texture.name(), "ground.jpg");
        assert_eq!(texture.path(), Some(file.as_path()));
        assert_eq!(texture.kind(), TextureKind::Texture2D);
    }

    #[test]
    fn from_file_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Texture::from_file(dir.path().join("sky.hdr"), TextureKind::Cubemap);
        assert!(matches!(err, Err(ResourceError::Io { .. })));
    }
}

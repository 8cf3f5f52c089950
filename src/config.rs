//=========================================================================
// Engine Configuration
//=========================================================================
//
// Startup parameters for the window and renderer. Loaded once before the
// engine is built, either from code (EngineBuilder) or from a TOML file.
//
// ```toml
// [window]
// width = 1280
// height = 1280
// title = "Particles"
//
// [renderer]
// clear_color = [0.0, 0.0, 0.0, 1.0]
// ambient_strength = 0.2
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use glam::{Vec3, Vec4};
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::error::ConfigError;

//=== EngineConfig ========================================================

/// Complete engine configuration. Missing sections/fields take defaults.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

//=== WindowConfig ========================================================

/// Native window parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Orrery Engine".to_string(),
            vsync: true,
        }
    }
}

//=== RendererConfig ======================================================

/// Initial renderer state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub clear_color: [f32; 4],
    pub ambient_strength: f32,
    pub light_position: [f32; 3],
    pub light_color: [f32; 3],
    pub light_intensity: f32,
}

impl RendererConfig {
    pub fn clear_color(&self) -> Vec4 {
        Vec4::from_array(self.clear_color)
    }

    pub fn light_position(&self) -> Vec3 {
        Vec3::from_array(self.light_position)
    }

    pub fn light_color(&self) -> Vec3 {
        Vec3::from_array(self.light_color)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.1, 0.1, 1.0],
            ambient_strength: 0.1,
            light_position: [0.0, 2.0, 0.0],
            light_color: [1.0, 1.0, 1.0],
            light_intensity: 1.0,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.renderer.ambient_strength, 0.1);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [window]
            width = 800
            title = "Test"

            [renderer]
            clear_color = [0.0, 0.0, 0.0, 1.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.window.title, "Test");
        assert!(config.window.vsync);
        assert_eq!(config.renderer.clear_color(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(config.renderer.light_intensity, 1.0);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("[window]\nwidth = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\nheight = 1280").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.window.height, 1280);
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

//=========================================================================
// Error Taxonomy
//=========================================================================
//
// Fatal, construction-time failures only. Everything discovered during
// the frame loop (missing behavior, unknown entity name, null submission,
// flush without camera) is reported through Option or a silent no-op.
//
//   EngineError
//     ├─ PlatformError   (event loop / window creation)
//     ├─ ResourceError   (file reads, shader compile, bad mesh data)
//     ├─ BehaviorError   (behavior init requirements)
//     ├─ ConfigError     (config file read / parse)
//     └─ Render          (backend initialization)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== PlatformError =======================================================

/// Native window and event loop failures.
///
/// These are always fatal: without a window the engine cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create the event loop (rare, indicates OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[from] winit::error::EventLoopError),

    /// The OS refused to create the window.
    #[error("window creation failed: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// The event loop exited before a window could be created.
    #[error("event loop exited before the window was created")]
    WindowUnavailable,
}

//=== ResourceError =======================================================

/// GPU-side resource loading failures.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A required file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend rejected a shader program.
    #[error("shader `{name}` failed to compile: {message}")]
    ShaderCompile { name: String, message: String },

    /// Mesh index references a vertex that does not exist.
    #[error("mesh index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

//=== BehaviorError =======================================================

/// Raised by [`Behavior::on_init`](crate::core::scene::Behavior::on_init)
/// when the owner does not provide what the behavior needs.
#[derive(Debug, Error)]
pub enum BehaviorError {
    /// The owning entity lacks a required capability.
    #[error("{behavior} requires its owner to have {requirement}")]
    MissingRequirement {
        behavior: &'static str,
        requirement: &'static str,
    },

    /// Behavior-specific failure.
    #[error("{0}")]
    Other(String),
}

//=== ConfigError =========================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

//=== EngineError =========================================================

/// Top-level error returned by engine construction and `run`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The render backend failed to initialize.
    #[error("renderer initialization failed: {0}")]
    Render(String),
}

//=========================================================================
// Unit Tests
//=========================================================================

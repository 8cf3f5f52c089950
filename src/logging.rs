//=========================================================================
// Logging
//=========================================================================
//
// All engine modules log through the `log` facade with a subsystem
// target ("engine", "scene", "renderer", "platform", ...). This module
// installs `env_logger` as the backend; `RUST_LOG` overrides the default
// `info` filter, e.g. `RUST_LOG=renderer=trace`.
//
//=========================================================================

use env_logger::Env;

/// Installs the global logger.
///
/// Safe to call more than once: later calls (or a logger installed by the
/// application beforehand) are left untouched.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

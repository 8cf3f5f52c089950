//=========================================================================
// Orrery Engine - Library Root
//
// Single-threaded game runtime: a window drives a frame loop that updates
// and renders one active scene of behavior-composed entities.
//
// Layout:
// - `engine`    frame loop, builder, frame clock
// - `core`      events, math, rendering, scenes
// - `behaviors` ready-made behaviors (gravity, orbit camera)
// - `platform`  native (winit) and headless windows
// - `config`, `error`, `logging` ambient plumbing
//
// Typical usage:
// ```no_run
// use orrery_engine::prelude::*;
//
// fn main() -> Result<(), EngineError> {
//     let mut engine = Engine::new(1280, 720, "Sandbox")?;
//     engine.set_scene(Scene::empty());
//     engine.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod behaviors;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineState, FrameClock};
pub use error::EngineError;

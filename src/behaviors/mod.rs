//=========================================================================
// Stock Behaviors
//=========================================================================
//
// Ready-made behaviors for common entity logic.
//
//=========================================================================

mod camera_orbit;
mod gravity;

pub use camera_orbit::CameraOrbitBehavior;
pub use gravity::{
    apply_mutual_attraction, gravitational_force, GravityBehavior, DEFAULT_GRAVITATIONAL_CONSTANT,
    DEFAULT_MIN_DISTANCE,
};

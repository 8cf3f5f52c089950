//=========================================================================
// Core Systems
//
// Everything that runs inside one frame, independent of the window:
// - `event`   typed events and the dispatcher
// - `math`    transforms
// - `render`  resources, camera, lights, the render queue
// - `scene`   entities, behaviors, scene hooks
//
//=========================================================================

pub mod event;
pub mod math;
pub mod render;
pub mod scene;

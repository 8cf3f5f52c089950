//=========================================================================
// Camera Orbit
//=========================================================================
//
// Middle-drag orbit and wheel zoom around the camera's target.
//
// The camera sits on a sphere around its target:
// ```text
// position = target + distance · (cos p · cos y, sin p, cos p · sin y)
// ```
// with yaw `y` and pitch `p` kept in degrees.
//
//=========================================================================

use glam::{Vec2, Vec3};
use log::info;

use crate::core::event::{
    Event, EventDispatcher, MouseButton, MouseButtonPressed, MouseButtonReleased, MouseMoved,
    MouseScrolled,
};
use crate::core::render::SharedCamera;
use crate::core::scene::{Behavior, EntityCore};
use crate::error::BehaviorError;

const ORBIT_BUTTON: MouseButton = MouseButton::Middle;
const PITCH_LIMIT_DEGREES: f32 = 85.0;

/// Orbits the owner's camera. The owner must carry a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraOrbitBehavior {
    distance: f32,
    sensitivity: f32,
    yaw_degrees: f32,
    pitch_degrees: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    orbiting: bool,
    last_cursor: Option<Vec2>,
}

impl CameraOrbitBehavior {
    pub fn new(distance: f32, sensitivity: f32) -> Self {
        Self {
            distance,
            sensitivity,
            yaw_degrees: -90.0,
            pitch_degrees: 0.0,
            zoom_speed: 0.25,
            min_distance: 1.0,
            max_distance: 30.0,
            orbiting: false,
            last_cursor: None,
        }
    }

    pub fn with_zoom_speed(mut self, zoom_speed: f32) -> Self {
        self.zoom_speed = zoom_speed;
        self
    }

    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        assert!(min <= max, "Invalid orbit distance limits: {} > {}", min, max);
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn yaw_degrees(&self) -> f32 {
        self.yaw_degrees
    }

    pub fn pitch_degrees(&self) -> f32 {
        self.pitch_degrees
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn is_orbiting(&self) -> bool {
        self.orbiting
    }

    /// Offset from the target for the current yaw, pitch and distance.
    pub fn orbit_offset(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw_degrees.to_radians(), self.pitch_degrees.to_radians());
        self.distance * Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin())
    }

    //--- Input ------------------------------------------------------------

    fn on_button(&mut self, button: MouseButton, pressed: bool) -> bool {
        if button != ORBIT_BUTTON {
            return false;
        }
        self.orbiting = pressed;
        self.last_cursor = None;
        true
    }

    /// Returns whether the move was consumed by an active orbit.
    fn on_cursor(&mut self, cursor: Vec2, camera: &SharedCamera) -> bool {
        if !self.orbiting {
            return false;
        }

        let Some(last) = self.last_cursor.replace(cursor) else {
            return true;
        };

        let delta = cursor - last;
        self.yaw_degrees += delta.x * self.sensitivity;
        self.pitch_degrees = (self.pitch_degrees + delta.y * self.sensitivity)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);

        self.place_camera(camera);
        true
    }

    fn on_scroll(&mut self, y_offset: f32, camera: &SharedCamera) -> bool {
        self.distance =
            (self.distance - y_offset * self.zoom_speed).clamp(self.min_distance, self.max_distance);
        self.place_camera(camera);
        true
    }

    fn place_camera(&self, camera: &SharedCamera) {
        let mut camera = camera.borrow_mut();
        let (target, up) = (camera.target(), camera.up());
        camera.set_position(target + self.orbit_offset());
        camera.set_look_at(target, up);
    }
}

impl Default for CameraOrbitBehavior {
    fn default() -> Self {
        Self::new(3.0, 0.2)
    }
}

impl Behavior for CameraOrbitBehavior {
    /// Adopts the camera's current offset from its target when it is not
    /// degenerate.
    fn on_init(&mut self, owner: &mut EntityCore) -> Result<(), BehaviorError> {
        let camera = owner.camera().ok_or(BehaviorError::MissingRequirement {
            behavior: "CameraOrbitBehavior",
            requirement: "a camera",
        })?;

        {
            let camera = camera.borrow();
            let offset = camera.position() - camera.target();
            let distance = offset.length();
            if distance > 0.001 {
                self.distance = distance;
                self.yaw_degrees = offset.z.atan2(offset.x).to_degrees();
                self.pitch_degrees = (offset.y / distance)
                    .clamp(-1.0, 1.0)
                    .asin()
                    .to_degrees()
                    .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
            }
        }

        info!(target: "scene",
            "Camera orbit on '{}': distance {:.2}, yaw {:.1}, pitch {:.1}",
            owner.name(), self.distance, self.yaw_degrees, self.pitch_degrees);

        self.place_camera(camera);
        Ok(())
    }

    fn on_event(&mut self, owner: &mut EntityCore, event: &mut Event) {
        let Some(camera) = owner.camera() else {
            return;
        };

        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.dispatch::<MouseButtonPressed, _>(|e| self.on_button(e.button, true));
        dispatcher.dispatch::<MouseButtonReleased, _>(|e| self.on_button(e.button, false));
        dispatcher.dispatch::<MouseMoved, _>(|e| self.on_cursor(Vec2::new(e.x, e.y), camera));
        dispatcher.dispatch::<MouseScrolled, _>(|e| self.on_scroll(e.y_offset, camera));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

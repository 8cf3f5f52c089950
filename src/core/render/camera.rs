//=========================================================================
// Camera
//=========================================================================
//
// Perspective look-at camera. Pure data: the renderer reads position,
// view and projection once per flush; behaviors move it around.
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

/// Camera shared between the renderer and whatever drives it.
pub type SharedCamera = Rc<RefCell<Camera>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    fov_degrees: f32,
    aspect_ratio: f32,
    near_plane: f32,
    far_plane: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Creates a camera at (0, 0, 5) looking at the origin.
    pub fn new(fov_degrees: f32, aspect_ratio: f32, near_plane: f32, far_plane: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees,
            aspect_ratio,
            near_plane,
            far_plane,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.recalculate_projection();
        camera.recalculate_view();
        camera
    }

    /// Wraps the camera for sharing with the renderer and behaviors.
    pub fn into_shared(self) -> SharedCamera {
        Rc::new(RefCell::new(self))
    }

    //--- Placement --------------------------------------------------------

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recalculate_view();
    }

    pub fn set_look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        self.recalculate_view();
    }

    pub fn set_perspective(&mut self, fov_degrees: f32, aspect_ratio: f32, near_plane: f32, far_plane: f32) {
        self.fov_degrees = fov_degrees;
        self.aspect_ratio = aspect_ratio;
        self.near_plane = near_plane;
        self.far_plane = far_plane;
        self.recalculate_projection();
    }

    /// Keeps fov and clip planes, changes only the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.recalculate_projection();
    }

    //--- Accessors --------------------------------------------------------

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    //--- Internal Helpers -------------------------------------------------

    fn recalculate_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.target, self.up);
    }

    fn recalculate_projection(&mut self) {
        self.projection = Mat4::perspective_rh_gl(
            self.fov_degrees.to_radians(),
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(45.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

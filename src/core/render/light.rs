//=========================================================================
// Light
//=========================================================================
//
// A light is a behavior: attach it to an entity and it follows that
// entity's transform. The renderer holds a single active light, pushed in
// with `Renderer::set_light` (usually from a scene's render hook).
//
//=========================================================================

use glam::{Quat, Vec3};

use super::Renderer;
use crate::core::math::Transform;
use crate::core::scene::{Behavior, EntityCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    Directional,
    #[default]
    Point,
    Spot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    light_type: LightType,
    color: Vec3,
    intensity: f32,
    range: f32,
    inner_angle: f32,
    outer_angle: f32,
    position: Vec3,
    direction: Vec3,
}

impl Light {
    pub fn new(light_type: LightType) -> Self {
        Self {
            light_type,
            color: Vec3::ONE,
            intensity: 1.0,
            range: 10.0,
            // 15° and 25°.
            inner_angle: 0.261_799,
            outer_angle: 0.436_332,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn light_type(&self) -> LightType {
        self.light_type
    }

    pub fn set_light_type(&mut self, light_type: LightType) {
        self.light_type = light_type;
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn set_range(&mut self, range: f32) {
        self.range = range;
    }

    /// Spot cone angles in radians, inner then outer.
    pub fn spot_angles(&self) -> (f32, f32) {
        (self.inner_angle, self.outer_angle)
    }

    pub fn set_spot_angles(&mut self, inner: f32, outer: f32) {
        self.inner_angle = inner;
        self.outer_angle = outer;
    }

    /// Offset from the owner, or the world position when unattached.
    pub fn local_position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize_or_zero();
    }

    /// Owner position plus the local offset.
    pub fn world_position(&self, owner: Option<&Transform>) -> Vec3 {
        match owner {
            Some(transform) => transform.position + self.position,
            None => self.position,
        }
    }

    /// Local direction rotated by the owner's orientation.
    pub fn world_direction(&self, owner: Option<&Transform>) -> Vec3 {
        let rotation = owner.map_or(Quat::IDENTITY, |transform| transform.rotation);
        (rotation * self.direction).normalize_or_zero()
    }

    /// Publishes this light to the renderer.
    pub fn apply(&self, renderer: &mut Renderer, owner: Option<&Transform>) {
        renderer.set_light(self, owner);
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(LightType::default())
    }
}

impl Behavior for Light {
    fn on_render(&mut self, owner: &EntityCore, renderer: &mut Renderer) {
        self.apply(renderer, Some(&owner.transform));
    }
}

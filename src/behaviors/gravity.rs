//=========================================================================
// Gravity
//=========================================================================
//
// Point-mass integration plus Newtonian attraction between bodies.
//
// Forces are accumulated between updates and consumed by the next
// `on_update`:
// ```text
// apply_force(f)* → on_update(dt): v += a·dt, p += v·dt, a = 0
// ```
//
//=========================================================================

use glam::Vec3;
use log::trace;

use crate::core::scene::{Behavior, Entities, EntityCore, EntityId};

/// Gravitational constant used by the demos.
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f32 = 0.1;

/// Bodies closer than this stop attracting each other.
pub const DEFAULT_MIN_DISTANCE: f32 = 0.1;

//=== GravityBehavior =====================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GravityBehavior {
    mass: f32,
    velocity: Vec3,
    acceleration: Vec3,
}

impl GravityBehavior {
    /// # Panics
    ///
    /// Panics if `mass <= 0.0`.
    pub fn new(mass: f32) -> Self {
        assert!(mass > 0.0, "Mass must be positive, got {}", mass);
        Self {
            mass,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Accumulates `force / mass` until the next update.
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force / self.mass;
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }
}

impl Default for GravityBehavior {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Behavior for GravityBehavior {
    fn on_update(&mut self, owner: &mut EntityCore, dt: f32) {
        self.velocity += self.acceleration * dt;
        owner.transform.position += self.velocity * dt;
        self.acceleration = Vec3::ZERO;
    }
}

//=== Attraction ==========================================================

/// Force on body 1 pulling it toward body 2, magnitude `g·m1·m2/d²`.
///
/// `None` when the bodies are closer than `min_distance`.
pub fn gravitational_force(
    g: f32,
    mass_1: f32,
    position_1: Vec3,
    mass_2: f32,
    position_2: Vec3,
    min_distance: f32,
) -> Option<Vec3> {
    let offset = position_2 - position_1;
    let distance = offset.length();
    if distance < min_distance || distance == 0.0 {
        return None;
    }

    let magnitude = g * mass_1 * mass_2 / (distance * distance);
    Some(offset / distance * magnitude)
}

/// Applies pairwise attraction between every active entity carrying a
/// [`GravityBehavior`]. Each pair gets equal and opposite forces.
///
/// Forces are only accumulated; positions move on the next update.
pub fn apply_mutual_attraction(entities: &mut Entities, g: f32, min_distance: f32) {
    let bodies: Vec<(EntityId, f32, Vec3)> = entities
        .iter()
        .filter(|entity| entity.is_active())
        .filter_map(|entity| {
            entity
                .get_behavior::<GravityBehavior>()
                .map(|gravity| (entity.id(), gravity.mass(), entity.transform().position))
        })
        .collect();

    let mut forces = vec![Vec3::ZERO; bodies.len()];
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (_, m1, p1) = bodies[i];
            let (_, m2, p2) = bodies[j];
            if let Some(force) = gravitational_force(g, m1, p1, m2, p2, min_distance) {
                forces[i] += force;
                forces[j] -= force;
            }
        }
    }

    for ((id, _, _), force) in bodies.iter().zip(forces) {
        if let Some(gravity) = entities
            .get_by_id_mut(*id)
            .and_then(|entity| entity.get_behavior_mut::<GravityBehavior>())
        {
            gravity.apply_force(force);
        }
    }

    trace!(target: "scene", "Applied attraction between {} bodies", bodies.len());
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::Entity;

    const EPSILON: f32 = 1e-6;

    fn body(name: &str, mass: f32, position: Vec3) -> Entity {
        let mut entity = Entity::new(name);
        entity.set_position(position);
        entity.add_behavior(GravityBehavior::new(mass)).unwrap();
        entity
    }

    #[test]
    fn two_body_force_obeys_inverse_square_and_third_law() {
        let (g, m1, m2) = (0.1, 1.0, 10.0);
        let p1 = Vec3::new(-2.0, 0.0, 0.0);
        let p2 = Vec3::new(2.0, 0.0, 0.0);

        let on_1 = gravitational_force(g, m1, p1, m2, p2, 0.1).unwrap();
        let on_2 = gravitational_force(g, m2, p2, m1, p1, 0.1).unwrap();

        let expected = g * m1 * m2 / 16.0;
        assert!((on_1.length() - expected).abs() < EPSILON);
        assert!(on_1.normalize().abs_diff_eq(Vec3::X, EPSILON), "force points along the line");
        assert!((on_1 + on_2).length() < EPSILON, "equal and opposite");
    }

    #[test]
    fn close_bodies_do_not_attract() {
        assert!(gravitational_force(1.0, 1.0, Vec3::ZERO, 1.0, Vec3::splat(0.01), 0.1).is_none());
        assert!(gravitational_force(1.0, 1.0, Vec3::ZERO, 1.0, Vec3::ZERO, 0.0).is_none());
    }

    #[test]
    fn update_integrates_then_resets_acceleration() {
        let mut entity = Entity::new("body");
        let gravity = entity.add_behavior(GravityBehavior::new(2.0)).unwrap();
        gravity.apply_force(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(gravity.acceleration(), Vec3::new(2.0, 0.0, 0.0));

        entity.on_update(0.5);

        let gravity = entity.get_behavior::<GravityBehavior>().unwrap();
        assert_eq!(gravity.velocity(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(gravity.acceleration(), Vec3::ZERO);
        assert_eq!(entity.transform().position, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn mutual_attraction_applies_opposite_forces() {
        let mut entities = Entities::default();
        let a = entities.add(body("a", 1.0, Vec3::new(-1.0, 0.0, 0.0)));
        let b = entities.add(body("b", 3.0, Vec3::new(1.0, 0.0, 0.0)));
        entities.add(Entity::new("scenery"));

        apply_mutual_attraction(&mut entities, 1.0, 0.1);

        let force_on = |id| {
            let entity = entities.get_by_id(id).unwrap();
            let gravity = entity.get_behavior::<GravityBehavior>().unwrap();
            gravity.acceleration() * gravity.mass()
        };
        let (fa, fb) = (force_on(a), force_on(b));

        // g·m1·m2/d² = 1·1·3/4
        assert!((fa.length() - 0.75).abs() < EPSILON);
        assert!((fa + fb).length() < EPSILON);
        assert!(fa.x > 0.0 && fb.x < 0.0, "bodies pull toward each other");
    }

    #[test]
    fn inactive_bodies_are_ignored() {
        let mut entities = Entities::default();
        let a = entities.add(body("a", 1.0, Vec3::ZERO));
        let b = entities.add(body("b", 1.0, Vec3::X));
        entities.get_by_id_mut(b).unwrap().set_active(false);

        apply_mutual_attraction(&mut entities, 1.0, 0.1);

        let gravity = entities.get_by_id(a).unwrap().get_behavior::<GravityBehavior>().unwrap();
        assert_eq!(gravity.acceleration(), Vec3::ZERO);
    }

    #[test]
    #[should_panic(expected = "Mass must be positive")]
    fn zero_mass_panics() {
        GravityBehavior::new(0.0);
    }
}

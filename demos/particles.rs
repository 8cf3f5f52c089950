//=========================================================================
// Particles Demo
//
// Two bodies in mutual orbit, a point light and a mouse-driven orbit
// camera. Drag with the middle button to orbit, scroll to zoom.
//
// Run with:
//   cargo run --example particles
//
//=========================================================================

use std::rc::Rc;

use log::info;
use orrery_engine::behaviors::{DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_MIN_DISTANCE};
use orrery_engine::core::render::Vertex;
use orrery_engine::prelude::*;

const VERTEX_SHADER: &str = r#"
#version 330 core
layout(location = 0) in vec3 aPos;
layout(location = 1) in vec3 aNormal;
uniform mat4 projection;
uniform mat4 view;
uniform mat4 model;
out vec3 vNormal;
out vec3 vWorldPos;
void main() {
    vec4 world = model * vec4(aPos, 1.0);
    vWorldPos = world.xyz;
    vNormal = mat3(transpose(inverse(model))) * aNormal;
    gl_Position = projection * view * world;
}
"#;

const FRAGMENT_SHADER: &str = r#"
#version 330 core
in vec3 vNormal;
in vec3 vWorldPos;
uniform vec4 color;
uniform vec3 lightPos;
uniform vec3 lightColor;
uniform float lightIntensity;
uniform float ambientStrength;
out vec4 FragColor;
void main() {
    vec3 n = normalize(vNormal);
    vec3 l = normalize(lightPos - vWorldPos);
    vec3 lit = (ambientStrength + max(dot(n, l), 0.0) * lightIntensity) * lightColor;
    FragColor = vec4(lit * color.rgb, color.a);
}
"#;

/// Unit octahedron; coarse but enough to see two bodies orbit.
fn octahedron() -> Result<Mesh, EngineError> {
    let corners = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    let vertices = corners
        .iter()
        .map(|&p| Vertex::new(p, p, Vec2::ZERO))
        .collect();
    let indices = vec![
        0, 2, 4, 2, 1, 4, 1, 3, 4, 3, 0, 4, //
        2, 0, 5, 1, 2, 5, 3, 1, 5, 0, 3, 5,
    ];
    Ok(Mesh::new(vertices, indices)?)
}

#[derive(Default)]
struct Particles {
    camera: Option<SharedCamera>,
}

impl Particles {
    fn particle(
        name: &str,
        mesh: &Rc<Mesh>,
        material: Rc<Material>,
        position: Vec3,
        velocity: Vec3,
        mass: f32,
    ) -> Result<Entity, EngineError> {
        let mut entity = Entity::new(name);
        entity.set_position(position);
        entity.set_model(Rc::new(
            Model::new(Rc::clone(mesh), material).with_scale(Vec3::splat(0.2)),
        ));
        entity.add_behavior(GravityBehavior::new(mass).with_velocity(velocity))?;
        Ok(entity)
    }
}

impl SceneHooks for Particles {
    fn on_init(&mut self, entities: &mut Entities) -> Result<(), EngineError> {
        let shader = Rc::new(Shader::from_source("lit", VERTEX_SHADER, FRAGMENT_SHADER));
        let mesh = Rc::new(octahedron()?);
        let warm = Rc::new(Material::new(Rc::clone(&shader)).with_color(Vec4::new(1.0, 0.6, 0.2, 1.0)));
        let cool = Rc::new(Material::new(shader).with_color(Vec4::new(0.2, 0.6, 1.0, 1.0)));

        let mut light = Entity::new("light");
        light.set_position(Vec3::new(2.0, 4.0, 2.0));
        light.add_behavior(Light::new(LightType::Point).with_intensity(1.2))?;
        entities.add(light);

        entities.add(Self::particle(
            "sun",
            &mesh,
            warm,
            Vec3::ZERO,
            Vec3::ZERO,
            10.0,
        )?);
        entities.add(Self::particle(
            "planet",
            &mesh,
            cool,
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.8),
            1.0,
        )?);

        // The orbit starts from wherever the camera sits.
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(0.0, 1.0, 4.0));
        let camera = camera.into_shared();
        let mut rig = Entity::new("camera");
        rig.set_camera(Rc::clone(&camera));
        rig.add_behavior(CameraOrbitBehavior::default())?;
        entities.add(rig);
        self.camera = Some(camera);

        info!("Particles scene ready ({} entities)", entities.len());
        Ok(())
    }

    fn on_update(&mut self, entities: &mut Entities, _dt: f32) {
        apply_mutual_attraction(entities, DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_MIN_DISTANCE);
    }

    fn on_render(&mut self, _entities: &Entities, renderer: &mut Renderer) {
        renderer.set_camera(self.camera.clone());
    }
}

fn main() -> Result<(), EngineError> {
    let mut engine = EngineBuilder::new()
        .with_size(1280, 720)
        .with_title("Orrery - Particles")
        .with_clear_color(Vec4::new(0.02, 0.02, 0.05, 1.0))
        .build()?;

    engine.set_scene(Scene::new(Particles::default()));
    engine.run()
}

//! The animated solar system: a glowing sun, moon and stars among lit
//! planets.

use std::path::Path;

use nalgebra as na;
use rand::Rng;

use crate::camera::Camera;
use crate::frame::Animate;
use crate::layers::Layers;
use crate::motion::{Orbit, Oscillator};
use crate::scene::{
    Background, Geometry, Material, ObjectDesc, ObjectId, Scene, SceneBuilder, TextureSource,
    Transform,
};
use crate::{Context, Light};

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

pub const STAR_COUNT: usize = 400;

/// Reach of the light the moon carries.
pub const MOON_LIGHT_RANGE: f32 = 3.0;

/// Index of the sun's light in `Context::lights`.
pub const SUN_LIGHT: usize = 0;

/// Index of the moon's light in `Context::lights`.
pub const MOON_LIGHT: usize = 1;

/// Stars are placed uniformly in a cube of this edge length.
pub const STAR_SPREAD: f32 = 200.0;

pub fn eye() -> na::Point3<f32> {
    na::Point3::new(-15.0, 35.0, 60.0)
}

pub fn camera(aspect: f32) -> Camera {
    Camera::new(FOV_Y_DEGREES, aspect, NEAR, FAR).looking_at(eye(), na::Point3::origin())
}

/// Camera plus the lights of the sun and the moon. Both are moved along
/// with their bodies by `SolarMotion`.
pub fn context(aspect: f32) -> Context {
    Context {
        camera: camera(aspect),
        lights: vec![Light::default(), Light::default().with_range(MOON_LIGHT_RANGE)],
        ambient_light: na::Vector3::new(0.05, 0.05, 0.05),
    }
}

#[derive(Debug, Clone)]
pub struct Bodies {
    pub sun: ObjectId,
    pub earth: ObjectId,
    pub moon: ObjectId,
    pub saturn: ObjectId,
    pub saturn_ring: ObjectId,
    pub jupiter: ObjectId,
    pub mars: ObjectId,
    pub mercury: ObjectId,
    pub uranus: ObjectId,
    pub neptune: ObjectId,
    pub stars: Vec<ObjectId>,
}

struct Builder<'a> {
    scene: SceneBuilder,
    assets: &'a Path,
}

impl<'a> Builder<'a> {
    fn texture(&mut self, file: &str, fallback: [f32; 3]) -> TextureSource {
        TextureSource {
            path: self.assets.join(file),
            fallback: na::Vector3::new(fallback[0], fallback[1], fallback[2]),
        }
    }

    fn body(
        &mut self,
        name: &str,
        geometry: Geometry,
        material: Material,
        layers: Layers,
        transform: Transform,
    ) -> ObjectId {
        let geometry = self.scene.add_geometry(geometry);
        let material = self.scene.add_material(material);

        self.scene.add_object(
            ObjectDesc::new(name, geometry, material)
                .with_layers(layers)
                .with_transform(transform),
        )
    }

    fn planet(&mut self, name: &str, radius: f32, file: &str, fallback: [f32; 3]) -> ObjectId {
        let source = self.texture(file, fallback);
        let map = self.scene.add_texture(source);

        self.body(
            name,
            Geometry::sphere(radius, 30, 30),
            Material::lit(na::Vector3::new(1.0, 1.0, 1.0)).with_map(map),
            Layers::default(),
            Transform::default(),
        )
    }

    fn glowing(&mut self, name: &str, radius: f32, file: &str, fallback: [f32; 3]) -> ObjectId {
        let source = self.texture(file, fallback);
        let map = self.scene.add_texture(source);

        self.body(
            name,
            Geometry::sphere(radius, 30, 30),
            Material::unlit(na::Vector3::new(1.0, 1.0, 1.0)).with_map(map),
            Layers::glowing(),
            Transform::default(),
        )
    }
}

/// Builds the scene with its textures loaded from `assets`. Stars are
/// scattered using `rng`.
pub fn build<R: Rng>(assets: &Path, rng: &mut R) -> (Scene, Bodies) {
    let mut builder = Builder {
        scene: SceneBuilder::new(),
        assets,
    };

    let sky = builder.texture("sky.jpg", [0.02, 0.02, 0.05]);
    let sky = builder.scene.add_texture(sky);
    builder.scene.set_background(Background::Texture(sky));

    let sun = builder.glowing("sun", 15.0, "sun.webp", [1.0, 0.75, 0.3]);

    let earth = builder.planet("earth", 3.0, "earth.webp", [0.2, 0.4, 0.8]);
    // Radians, not degrees.
    builder.scene.transform_mut(earth).rotation.z = 45.0;

    let moon = builder.glowing("moon", 1.2, "moon.jpg", [0.7, 0.7, 0.7]);
    let saturn = builder.planet("saturn", 5.0, "saturn.webp", [0.85, 0.75, 0.55]);

    let ring_source = builder.texture("saturn ring.jpg", [0.8, 0.7, 0.5]);
    let ring_map = builder.scene.add_texture(ring_source);
    let saturn_ring = builder.body(
        "saturn_ring",
        Geometry::ring(6.0, 10.0, 30, 1),
        Material::lit(na::Vector3::new(1.0, 1.0, 1.0))
            .with_map(ring_map)
            .with_double_sided(),
        Layers::default(),
        Transform {
            rotation: na::Vector3::new(-45.0, 0.0, 0.0),
            ..Default::default()
        },
    );

    let jupiter = builder.planet("jupiter", 7.0, "jupiter.jpg", [0.8, 0.65, 0.5]);
    let mars = builder.planet("mars", 2.5, "mars.webp", [0.8, 0.35, 0.2]);
    let mercury = builder.planet("mercury", 1.7, "mercury.jpg", [0.6, 0.6, 0.6]);
    let uranus = builder.planet("uranus", 3.5, "uranus.jpg", [0.6, 0.85, 0.9]);
    let neptune = builder.planet("neptune", 3.2, "neptune.jpg", [0.3, 0.45, 0.9]);

    let star_geometry = builder.scene.add_geometry(Geometry::sphere(0.2, 24, 24));
    let star_material = builder
        .scene
        .add_material(Material::unlit(na::Vector3::new(1.0, 1.0, 1.0)));
    let half = STAR_SPREAD / 2.0;
    let stars = (0..STAR_COUNT)
        .map(|i| {
            let position = na::Vector3::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            );

            builder.scene.add_object(
                ObjectDesc::new(&format!("star_{}", i), star_geometry, star_material)
                    .with_layers(Layers::glowing())
                    .with_transform(Transform::at(position)),
            )
        })
        .collect();

    let bodies = Bodies {
        sun,
        earth,
        moon,
        saturn,
        saturn_ring,
        jupiter,
        mars,
        mercury,
        uranus,
        neptune,
        stars,
    };

    (builder.scene.build(), bodies)
}

/// Spins and orbits of the bodies, advanced once per frame.
pub struct SolarMotion {
    bodies: Bodies,

    /// Radians added to the Y rotation per frame.
    spins: Vec<(ObjectId, f32)>,

    earth: Orbit,
    moon: Orbit,
    saturn: Orbit,
    jupiter: Orbit,
    mars: Orbit,
    mercury: Orbit,
    uranus: Orbit,
    neptune: Orbit,
}

impl SolarMotion {
    pub fn new(bodies: Bodies) -> Self {
        let speed = Oscillator::DEFAULT_SPEED;

        let spins = vec![
            (bodies.sun, 0.001),
            (bodies.earth, 0.01),
            (bodies.moon, 0.02),
            (bodies.saturn, 0.01),
            (bodies.jupiter, 0.03),
            (bodies.mars, 0.015),
            (bodies.mercury, 0.015),
            (bodies.uranus, 0.015),
        ];

        Self {
            bodies,
            spins,
            earth: Orbit::elliptic(na::Vector3::new(-35.0, 20.0, -30.0), speed),
            moon: Orbit::elliptic(na::Vector3::new(5.0, 5.0, -5.0), 0.015),
            saturn: Orbit::elliptic(na::Vector3::new(-50.0, -40.0, 30.0), speed).with_start_x(90.0),
            jupiter: Orbit::elliptic(na::Vector3::new(60.0, 50.0, 40.0), speed).with_start_x(90.0),
            mars: Orbit::elliptic(na::Vector3::new(-42.0, 27.0, -37.0), 0.005),
            mercury: Orbit::elliptic(na::Vector3::new(25.0, 10.0, -20.0), 0.01),
            uranus: Orbit::elliptic(na::Vector3::new(-70.0, 60.0, 50.0), speed),
            neptune: Orbit::elliptic(na::Vector3::new(80.0, 70.0, -60.0), speed),
        }
    }

    pub fn bodies(&self) -> &Bodies {
        &self.bodies
    }
}

impl Animate for SolarMotion {
    fn animate(&mut self, scene: &mut Scene, context: &mut Context) {
        for &(id, spin) in self.spins.iter() {
            scene.transform_mut(id).rotation.y += spin;
        }

        let earth = self.earth.advance();
        scene.transform_mut(self.bodies.earth).position = earth;
        scene.transform_mut(self.bodies.moon).position = earth + self.moon.advance();

        let saturn = self.saturn.advance();
        scene.transform_mut(self.bodies.saturn).position = saturn;
        scene.transform_mut(self.bodies.saturn_ring).position = saturn;

        let placements = [
            (self.bodies.jupiter, self.jupiter.advance()),
            (self.bodies.mars, self.mars.advance()),
            (self.bodies.mercury, self.mercury.advance()),
            (self.bodies.uranus, self.uranus.advance()),
            (self.bodies.neptune, self.neptune.advance()),
        ];
        for &(id, position) in placements.iter() {
            scene.transform_mut(id).position = position;
        }

        let carriers = [(SUN_LIGHT, self.bodies.sun), (MOON_LIGHT, self.bodies.moon)];
        for &(index, body) in carriers.iter() {
            if let Some(light) = context.lights.get_mut(index) {
                light.position = na::Point3::origin() + scene.object(body).transform.position;
            }
        }
    }
}

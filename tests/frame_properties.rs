//! Headless checks of the selective bloom frame using the software renderer.

use std::path::Path;

use nalgebra as na;
use rand::rngs::StdRng;
use rand::SeedableRng;

use solar_bloom::scene::{Geometry, Material, MaterialId, ObjectDesc, TextureSource, Transform};
use solar_bloom::software::Image;
use solar_bloom::solar_system::{self, SolarMotion};
use solar_bloom::{
    Camera, Config, Context, FrameDriver, FrameRenderer, FrameSize, Layers, Light, Scene,
    SceneBuilder, SoftwareRenderer,
};

const WIDTH: u32 = 96;
const HEIGHT: u32 = 64;

/// Screen-space centers of the two spheres of `two_spheres`.
const LEFT_CENTER: (u32, u32) = (27, 32);
const RIGHT_CENTER: (u32, u32) = (68, 32);

fn context() -> Context {
    Context {
        camera: Camera::new(75.0, WIDTH as f32 / HEIGHT as f32, 0.1, 1000.0)
            .looking_at(na::Point3::new(0.0, 0.0, 20.0), na::Point3::origin()),
        lights: vec![Light {
            position: na::Point3::new(0.0, 0.0, 20.0),
            ..Default::default()
        }],
        ambient_light: na::Vector3::new(0.1, 0.1, 0.1),
    }
}

/// An emissive white sphere on the left and a textured, lit sphere on the
/// right. `left_glows` decides whether the left one is in the bloom layer.
fn two_spheres(left_glows: bool) -> Scene {
    let mut builder = SceneBuilder::new();
    let sphere = builder.add_geometry(Geometry::sphere(2.0, 16, 16));

    let white = builder.add_material(Material::unlit(na::Vector3::new(1.0, 1.0, 1.0)));
    let texture = builder.add_texture(TextureSource {
        path: "missing/rock.jpg".into(),
        fallback: na::Vector3::new(0.8, 0.5, 0.3),
    });
    let rock = builder.add_material(Material::lit(na::Vector3::new(1.0, 1.0, 1.0)).with_map(texture));

    let left_layers = if left_glows {
        Layers::glowing()
    } else {
        Layers::default()
    };

    builder.add_object(
        ObjectDesc::new("emissive", sphere, white)
            .with_layers(left_layers)
            .with_transform(Transform::at(na::Vector3::new(-10.0, 0.0, 0.0))),
    );
    builder.add_object(
        ObjectDesc::new("textured", sphere, rock)
            .with_transform(Transform::at(na::Vector3::new(10.0, 0.0, 0.0))),
    );

    builder.build()
}

fn setup(scene: Scene) -> (FrameDriver<()>, SoftwareRenderer, Image) {
    let size = FrameSize::clamped(WIDTH, HEIGHT);
    let renderer = SoftwareRenderer::new(&Config::default(), &scene, size);
    let target = renderer.create_target();
    let driver = FrameDriver::new(scene, context(), (), size);

    (driver, renderer, target)
}

fn pixel(image: &Image, (x, y): (u32, u32)) -> [f32; 3] {
    image.get_pixel(x, y).0
}

fn brightness(color: [f32; 3]) -> f32 {
    color[0] + color[1] + color[2]
}

fn materials(scene: &Scene) -> Vec<MaterialId> {
    scene.objects().iter().map(|object| object.material()).collect()
}

#[test]
fn glow_surrounds_only_the_bloom_sphere() {
    let (mut driver, mut renderer, mut target) = setup(two_spheres(true));

    driver.draw_frame(&mut renderer, &mut target).unwrap();

    let bloom = renderer.bloom_output();
    let base = renderer.base_output();

    // Inside and just outside the emissive sphere.
    assert!(brightness(pixel(bloom, LEFT_CENTER)) > 0.5);
    let halo = (LEFT_CENTER.0 + 7, LEFT_CENTER.1);
    assert_eq!(brightness(pixel(base, halo)), 0.0);
    assert!(brightness(pixel(bloom, halo)) > 0.0);
    assert!(brightness(pixel(&target, halo)) > 0.0);

    // The textured sphere shows its map and gets no bloom at all.
    let textured = pixel(base, RIGHT_CENTER);
    assert!(textured[0] > textured[1] && textured[1] > textured[2]);
    for y in RIGHT_CENTER.1 - 6..RIGHT_CENTER.1 + 6 {
        for x in RIGHT_CENTER.0 - 6..RIGHT_CENTER.0 + 6 {
            assert_eq!(pixel(bloom, (x, y)), [0.0; 3], "bloom at {}, {}", x, y);
        }
    }
}

#[test]
fn without_bloom_objects_the_bloom_buffer_is_black() {
    let (mut driver, mut renderer, mut target) = setup(two_spheres(false));

    driver.draw_frame(&mut renderer, &mut target).unwrap();

    assert!(renderer.bloom_output().pixels().all(|p| p.0 == [0.0; 3]));

    let zero = Image::new(WIDTH, HEIGHT);
    let expected =
        solar_bloom::software::post::composite(renderer.base_output(), &zero, renderer.config());
    assert_eq!(target.as_raw(), expected.as_raw());
}

#[test]
fn repeated_frames_are_identical() {
    let (mut driver, mut renderer, mut first) = setup(two_spheres(true));
    let mut second = renderer.create_target();

    driver.draw_frame(&mut renderer, &mut first).unwrap();
    driver.draw_frame(&mut renderer, &mut second).unwrap();

    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn materials_survive_frames() {
    let (mut driver, mut renderer, mut target) = setup(two_spheres(true));
    let before = materials(driver.scene());

    for _ in 0..3 {
        driver.draw_frame(&mut renderer, &mut target).unwrap();
        assert_eq!(materials(driver.scene()), before);
    }

    let flat = driver.selection().flat_material();
    assert!(!materials(driver.scene()).contains(&flat));
}

#[test]
fn resized_frames_use_new_dimensions() {
    let (mut driver, mut renderer, mut target) = setup(two_spheres(true));

    for &(width, height) in &[(40, 30), (17, 91), (128, 8)] {
        driver.resize(&mut renderer, width, height).unwrap();
        driver.draw_frame(&mut renderer, &mut target).unwrap();

        assert_eq!(target.dimensions(), (width, height));
        assert_eq!(renderer.bloom_output().dimensions(), (width, height));
        assert_eq!(driver.context().camera.aspect(), width as f32 / height as f32);
    }
}

#[test]
fn zero_sized_resize_is_clamped() {
    let (mut driver, mut renderer, mut target) = setup(two_spheres(true));

    driver.resize(&mut renderer, 0, 0).unwrap();
    driver.draw_frame(&mut renderer, &mut target).unwrap();

    assert_eq!(target.dimensions(), (1, 1));
    assert_eq!(renderer.size(), FrameSize::clamped(1, 1));
}

#[test]
fn solar_system_frame_blooms_the_sun() {
    let (scene, bodies) =
        solar_system::build(Path::new("no/assets"), &mut StdRng::seed_from_u64(3));
    let size = FrameSize::clamped(64, 36);
    let mut renderer = SoftwareRenderer::new(&Config::default(), &scene, size);
    let mut target = renderer.create_target();
    let mut driver = FrameDriver::new(
        scene,
        solar_system::context(size.aspect()),
        SolarMotion::new(bodies),
        size,
    );

    driver.draw_frame(&mut renderer, &mut target).unwrap();
    driver.draw_frame(&mut renderer, &mut target).unwrap();

    // The sun sits at the origin, which the camera looks at.
    assert!(renderer
        .bloom_output()
        .pixels()
        .any(|p| brightness(p.0) > 0.1));

    let earth = driver.scene().object(driver.animation().bodies().earth);
    assert_ne!(earth.transform.position, na::Vector3::zeros());
}

#[test]
fn renderer_resize_alone_reallocates_buffers() {
    let scene = two_spheres(true);
    let mut renderer =
        SoftwareRenderer::new(&Config::default(), &scene, FrameSize::clamped(WIDTH, HEIGHT));

    renderer.resize(FrameSize::clamped(10, 20)).unwrap();

    assert_eq!(renderer.bloom_output().dimensions(), (10, 20));
    assert_eq!(renderer.create_target().dimensions(), (10, 20));
}

#[test]
fn classification_and_cache_cover_every_object() {
    let (mut driver, mut renderer, mut target) = setup(two_spheres(true));
    let before = driver.selection().classification().clone();

    driver.draw_frame(&mut renderer, &mut target).unwrap();

    let selection = driver.selection();
    assert_eq!(selection.classification(), &before);
    assert_eq!(
        solar_bloom::selective::Classification::classify(driver.scene()),
        before
    );

    for object in driver.scene().objects() {
        let cached = selection.cache().contains(object.id());
        assert_eq!(cached, !object.layers().is_bloom_member(), "{}", object.name());
    }
    assert_eq!(selection.cache().len(), before.non_bloom.len());
}

#[test]
fn frame_buffers_are_reused_until_resize() {
    let (mut driver, mut renderer, mut target) = setup(two_spheres(true));
    let buffers = |renderer: &SoftwareRenderer, target: &Image| {
        (
            renderer.bloom_output().as_raw().as_ptr(),
            renderer.base_output().as_raw().as_ptr(),
            target.as_raw().as_ptr(),
        )
    };

    driver.draw_frame(&mut renderer, &mut target).unwrap();
    let first = buffers(&renderer, &target);
    driver.draw_frame(&mut renderer, &mut target).unwrap();

    assert_eq!(buffers(&renderer, &target), first);

    driver.resize(&mut renderer, 40, 30).unwrap();
    driver.draw_frame(&mut renderer, &mut target).unwrap();
    let resized = buffers(&renderer, &target);

    assert_ne!(resized.0, first.0);
    assert_ne!(resized.1, first.1);
    assert_eq!(target.dimensions(), (40, 30));
}

use std::f64::consts::FRAC_1_PI;
use std::rc::Rc;

use rand::{rngs::StdRng, SeedableRng};

use super::*;
use crate::geometry::Triangle;
use crate::material::Material;
use crate::scene::PointLight;

const FAR: f64 = 1000.0;

/// Horizontal plane at height `y` facing `normal_y`, large enough to fill any view.
fn plane(y: f64, normal_y: f64) -> Triangle {
    Triangle::new(
        Vec3::constant(-FAR, y, -FAR),
        Vec3::constant(3.0 * FAR, y, -FAR),
        Vec3::constant(-FAR, y, 3.0 * FAR),
        Vec3::constant(0.0, normal_y, 0.0),
    )
}

fn down_ray() -> Ray {
    Ray::new(Vec3::constant(0.0, 1.0, 0.0), &Vec3::constant(0.0, -1.0, 0.0)).unwrap()
}

fn lit_floor(kd: Vec3) -> Scene {
    let mut scene = Scene::new();
    scene.add_shape(plane(0.0, 1.0), Rc::new(Material::diffuse(kd)));
    scene.add_light(PointLight {
        position: Vec3::constant(0.0, 2.0, 0.0),
        power: Vec3::constant(4.0, 4.0, 4.0),
    });
    scene
}

#[test]
fn zero_depth_and_misses_are_black() {
    let mut rng = StdRng::seed_from_u64(0);
    let integrator = PathIntegrator::new(4, 1);
    let scene = lit_floor(Vec3::constant(1.0, 1.0, 1.0));
    let black = integrator.li(&scene, &down_ray(), 0, &mut rng).unwrap();
    assert_eq!(black.values(), [0.0; 3]);

    let up = Ray::new(Vec3::constant(0.0, 1.0, 0.0), &Vec3::constant(0.0, 1.0, 0.0)).unwrap();
    let miss = integrator.li(&scene, &up, 4, &mut rng).unwrap();
    assert_eq!(miss.values(), [0.0; 3]);
}

#[test]
fn emitters_return_emission_directly() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut scene = Scene::new();
    scene.add_shape(
        plane(0.0, 1.0),
        Rc::new(Material::emitter(Vec3::constant(0.5, 1.0, 2.0))),
    );
    let l = PathIntegrator::new(1, 1)
        .li(&scene, &down_ray(), 1, &mut rng)
        .unwrap();
    assert_eq!(l.values(), [0.5, 1.0, 2.0]);
}

#[test]
fn absorbing_surface_is_black() {
    let mut rng = StdRng::seed_from_u64(0);
    let scene = lit_floor(Vec3::zeros());
    let l = PathIntegrator::new(8, 1)
        .li(&scene, &down_ray(), 8, &mut rng)
        .unwrap();
    assert_eq!(l.values(), [0.0; 3]);
}

#[test]
fn direct_light_is_bsdf_times_irradiance() {
    let mut rng = StdRng::seed_from_u64(0);
    let kd = Vec3::parameter(1.0, 1.0, 1.0);
    let scene = lit_floor(kd.clone());
    // Depth 1: the bounce ray returns black, leaving only next-event estimation.
    let l = PathIntegrator::new(1, 1)
        .li(&scene, &down_ray(), 1, &mut rng)
        .unwrap();
    for c in l.values() {
        assert!((c - FRAC_1_PI).abs() < 1e-9, "{l}");
    }
    l.x.backward();
    let [gx, gy, gz] = kd.grads();
    assert!((gx - FRAC_1_PI).abs() < 1e-9);
    assert_eq!((gy, gz), (0.0, 0.0));
}

#[test]
fn diffuse_floor_under_emitter_needs_two_bounces() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut scene = Scene::new();
    scene.add_shape(
        plane(0.0, 1.0),
        Rc::new(Material::diffuse(Vec3::constant(1.0, 1.0, 1.0))),
    );
    scene.add_shape(
        plane(2.0, -1.0),
        Rc::new(Material::emitter(Vec3::constant(1.0, 1.0, 1.0))),
    );
    let integrator = PathIntegrator::new(2, 1);
    let one = integrator.li(&scene, &down_ray(), 1, &mut rng).unwrap();
    assert_eq!(one.values(), [0.0; 3]);
    // kd = 1 is always selected with probability 1; every bounce reaches the emitter.
    let two = integrator.li(&scene, &down_ray(), 2, &mut rng).unwrap();
    for c in two.values() {
        assert!((c - 1.0).abs() < 1e-9, "{two}");
    }
}

#[test]
fn mirror_reflects_toward_emitter() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut scene = Scene::new();
    scene.add_shape(
        plane(0.0, 1.0),
        Rc::new(Material::new(
            Vec3::zeros(),
            Vec3::zeros(),
            Vec3::constant(1.0, 1.0, 1.0),
            Vec3::zeros(),
        )),
    );
    scene.add_shape(
        plane(2.0, -1.0),
        Rc::new(Material::emitter(Vec3::constant(1.0, 1.0, 1.0))),
    );
    let slanted = Ray::new(Vec3::constant(0.0, 1.0, 0.0), &Vec3::constant(0.6, -0.8, 0.0)).unwrap();
    let l = PathIntegrator::new(2, 1)
        .li(&scene, &slanted, 2, &mut rng)
        .unwrap();
    assert!(l.x.value() > 0.0);
    assert_eq!(l.x.value(), l.z.value());
}

#[test]
fn render_averages_samples_per_pixel() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut scene = Scene::new();
    // Emissive plane filling the default camera's view.
    scene.add_shape(
        Triangle::new(
            Vec3::constant(-FAR, -FAR, 1.0),
            Vec3::constant(3.0 * FAR, -FAR, 1.0),
            Vec3::constant(-FAR, 3.0 * FAR, 1.0),
            Vec3::constant(0.0, 0.0, -1.0),
        ),
        Rc::new(Material::emitter(Vec3::constant(0.25, 0.5, 1.0))),
    );
    let image = PathIntegrator::new(3, 4)
        .render(&scene, &Camera::default(), 3, 2, &mut rng)
        .unwrap();
    assert_eq!((image.width(), image.height()), (3, 2));
    for pixel in image.pixels() {
        assert_eq!(pixel.values(), [0.25, 0.5, 1.0]);
    }
}

#[test]
fn render_rejects_empty_settings() {
    let mut rng = StdRng::seed_from_u64(0);
    let scene = Scene::new();
    let camera = Camera::default();
    assert!(matches!(
        PathIntegrator::new(1, 1).render(&scene, &camera, 0, 4, &mut rng),
        Err(RenderError::InvalidSettings(_))
    ));
    assert!(matches!(
        PathIntegrator::new(1, 0).render(&scene, &camera, 4, 4, &mut rng),
        Err(RenderError::InvalidSettings(_))
    ));
}

#[test]
fn same_seed_renders_same_image() {
    let (scene, _) = crate::scene::cornell::cornell_box([0.0, 0.0, 0.9]);
    let integrator = PathIntegrator::new(4, 2);
    let render = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        integrator
            .render(&scene, &Camera::default(), 4, 4, &mut rng)
            .unwrap()
    };
    let (a, b) = (render(9), render(9));
    for (p, q) in a.pixels().iter().zip(b.pixels()) {
        assert_eq!(p, q);
    }
}

#[test]
fn many_samples_with_tracked_weight_backpropagate_and_drop() {
    let mut rng = StdRng::seed_from_u64(5);
    let kd = Vec3::parameter(0.5, 0.5, 0.5);
    let scene = lit_floor(kd.clone());
    let camera = Camera {
        eye: Vec3::constant(0.0, 1.0, 0.0),
        forward: Vec3::constant(0.0, -1.0, 0.0),
        up: Vec3::constant(0.0, 0.0, 1.0),
        left: Vec3::constant(-1.0, 0.0, 0.0),
    };
    let image = PathIntegrator::new(2, 4096)
        .render(&scene, &camera, 1, 1, &mut rng)
        .unwrap();
    image.pixels()[0].x.backward();
    let [gx, gy, gz] = kd.grads();
    assert!(gx.is_finite() && gx > 0.0, "{gx}");
    assert_eq!((gy, gz), (0.0, 0.0));
    drop(image);
    assert_eq!(kd.values(), [0.5; 3]);
}

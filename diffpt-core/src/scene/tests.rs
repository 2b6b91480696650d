use std::rc::Rc;

use super::cornell::cornell_box;
use super::*;
use crate::bsdf::Lobe;
use crate::geometry::{Sphere, Triangle};

fn ray(origin: [f64; 3], direction: [f64; 3]) -> Ray {
    Ray::new(
        Vec3::from_values(origin, false),
        &Vec3::from_values(direction, false),
    )
    .unwrap()
}

fn assert_close(a: &Vec3, b: [f64; 3]) {
    for (x, y) in a.values().into_iter().zip(b) {
        assert!((x - y).abs() < 1e-9, "{a} vs {b:?}");
    }
}

fn grey(k: f64) -> Rc<Material> {
    Rc::new(Material::diffuse(Vec3::constant(k, k, k)))
}

#[test]
fn intersect_returns_closest_object() {
    let mut scene = Scene::new();
    scene.add_shape(Sphere::new(Vec3::constant(0.0, 0.0, 5.0), 1.0), grey(0.1));
    scene.add_shape(Sphere::new(Vec3::constant(0.0, 0.0, 2.0), 0.5), grey(0.2));
    let hit = scene
        .intersect(&ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]))
        .unwrap()
        .unwrap();
    assert!((hit.intersection.t.value() - 1.5).abs() < 1e-9);
    assert_eq!(hit.material.probability(Lobe::Diffuse), 0.2);
}

#[test]
fn intersect_tie_keeps_first_object() {
    let mut scene = Scene::new();
    let sphere = || Sphere::new(Vec3::constant(0.0, 0.0, 3.0), 1.0);
    scene.add_shape(sphere(), grey(0.3));
    scene.add_shape(sphere(), grey(0.6));
    let hit = scene
        .intersect(&ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]))
        .unwrap()
        .unwrap();
    assert_eq!(hit.material.probability(Lobe::Diffuse), 0.3);
}

#[test]
fn empty_scene_has_no_hit() {
    let scene = Scene::new();
    assert!(scene
        .intersect(&ray([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]))
        .unwrap()
        .is_none());
}

fn floor_hit() -> Intersection {
    let floor = Triangle::new(
        Vec3::constant(-10.0, 0.0, -10.0),
        Vec3::constant(30.0, 0.0, -10.0),
        Vec3::constant(-10.0, 0.0, 30.0),
        Vec3::constant(0.0, 1.0, 0.0),
    );
    floor
        .intersect(&ray([0.0, 1.0, 0.0], [0.0, -1.0, 0.0]))
        .unwrap()
        .unwrap()
}

#[test]
fn point_light_irradiance_falls_off_with_cosine_and_distance() {
    let mut scene = Scene::new();
    scene.add_light(PointLight {
        position: Vec3::constant(0.0, 2.0, 0.0),
        power: Vec3::constant(4.0, 8.0, 0.0),
    });
    scene.add_light(PointLight {
        position: Vec3::constant(3.0, 4.0, 0.0),
        power: Vec3::constant(25.0, 25.0, 25.0),
    });
    let samples = scene.point_light_nee(&floor_hit()).unwrap();
    assert_eq!(samples.len(), 2);

    let overhead = &samples[0];
    assert_close(&overhead.direction, [0.0, 1.0, 0.0]);
    assert_close(&overhead.irradiance, [1.0, 2.0, 0.0]);

    // cos = 0.8, distance^2 = 25
    assert_close(&samples[1].irradiance, [0.8, 0.8, 0.8]);
}

#[test]
fn point_light_below_surface_contributes_nothing() {
    let mut scene = Scene::new();
    scene.add_light(PointLight {
        position: Vec3::constant(0.0, -2.0, 0.0),
        power: Vec3::constant(1.0, 1.0, 1.0),
    });
    let samples = scene.point_light_nee(&floor_hit()).unwrap();
    assert_close(&samples[0].irradiance, [0.0; 3]);
}

#[test]
fn point_light_ignores_occluders() {
    let mut scene = Scene::new();
    scene.add_shape(Sphere::new(Vec3::constant(0.0, 1.0, 0.0), 0.5), grey(0.5));
    scene.add_light(PointLight {
        position: Vec3::constant(0.0, 2.0, 0.0),
        power: Vec3::constant(4.0, 4.0, 4.0),
    });
    let samples = scene.point_light_nee(&floor_hit()).unwrap();
    assert_close(&samples[0].irradiance, [1.0, 1.0, 1.0]);
}

#[test]
fn point_light_on_the_shading_point_is_an_error() {
    let mut scene = Scene::new();
    scene.add_light(PointLight {
        position: Vec3::zeros(),
        power: Vec3::constant(1.0, 1.0, 1.0),
    });
    assert_eq!(
        scene.point_light_nee(&floor_hit()).unwrap_err(),
        AutogradError::DivisionByZero
    );
}

#[test]
fn cornell_box_shares_right_wall_material() {
    let (scene, right_wall) = cornell_box([0.0, 0.0, 0.9]);
    assert_eq!(scene.objects().len(), 11);
    let sharing = scene
        .objects()
        .iter()
        .filter(|object| Rc::ptr_eq(&object.material, &right_wall))
        .count();
    assert_eq!(sharing, 2);
    assert_eq!(
        right_wall.bsdf(Lobe::Diffuse).weight().values(),
        [0.0, 0.0, 0.9]
    );
}

#[test]
fn cornell_box_right_wall_is_hit_from_the_inside() {
    let (scene, right_wall) = cornell_box([0.0, 0.0, 0.9]);
    let hit = scene
        .intersect(&ray([0.0, 0.3, 0.5], [1.0, 0.0, 0.0]))
        .unwrap()
        .unwrap();
    assert!(std::ptr::eq(hit.material, Rc::as_ptr(&right_wall)));
    assert!(hit.intersection.entering);
    assert!((hit.intersection.t.value() - 1.0).abs() < 1e-9);
}

#[test]
fn cornell_box_ceiling_is_the_only_emitter() {
    let (scene, _) = cornell_box([0.0, 0.0, 0.9]);
    let emitters = scene
        .objects()
        .iter()
        .filter(|object| object.material.is_emissive())
        .count();
    assert_eq!(emitters, 2);
    let hit = scene
        .intersect(&ray([0.3, 0.0, 0.5], [0.0, 1.0, 0.0]))
        .unwrap()
        .unwrap();
    assert!(hit.material.is_emissive());
}

//! Cornell box test scene.
//!
//! Walls span x, y in [-1, 1] and z in [0, 1] (back wall at z = 1), viewed from the
//! default [`Camera`](crate::camera::Camera). The ceiling is the only light source.

use std::rc::Rc;

use crate::autograd::Vec3;
use crate::geometry::{Sphere, Triangle};
use crate::material::Material;
use crate::scene::Scene;

fn quad(
    scene: &mut Scene,
    corners: [[f64; 3]; 4],
    normal: [f64; 3],
    material: &Rc<Material>,
) {
    let [a, b, c, d] = corners.map(|p| Vec3::from_values(p, false));
    let n = Vec3::from_values(normal, false);
    scene.add_shape(
        Triangle::new(a, b.clone(), d.clone(), n.clone()),
        Rc::clone(material),
    );
    scene.add_shape(Triangle::new(b, c, d, n), Rc::clone(material));
}

/// Builds the Cornell box with the right wall's diffuse weight set to `right_wall_kd`.
///
/// Returns the scene and the right-wall material, which both right-wall triangles share.
#[must_use]
pub fn cornell_box(right_wall_kd: [f64; 3]) -> (Scene, Rc<Material>) {
    let mut scene = Scene::new();
    let white = || Rc::new(Material::diffuse(Vec3::constant(0.9, 0.9, 0.9)));

    quad(
        &mut scene,
        [
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ],
        [0.0, 0.0, -1.0],
        &white(),
    );
    quad(
        &mut scene,
        [
            [-1.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ],
        [0.0, -1.0, 0.0],
        &Rc::new(Material::emitter(Vec3::constant(1.0, 1.0, 1.0))),
    );
    quad(
        &mut scene,
        [
            [-1.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
        ],
        [0.0, 1.0, 0.0],
        &white(),
    );
    quad(
        &mut scene,
        [
            [-1.0, -1.0, 0.0],
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, 1.0, 0.0],
        ],
        [1.0, 0.0, 0.0],
        &Rc::new(Material::diffuse(Vec3::constant(0.9, 0.0, 0.0))),
    );

    let right_wall = Rc::new(Material::diffuse(Vec3::from_values(right_wall_kd, false)));
    quad(
        &mut scene,
        [
            [1.0, -1.0, 0.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
        ],
        [-1.0, 0.0, 0.0],
        &right_wall,
    );

    scene.add_shape(
        Sphere::new(Vec3::constant(-0.5, -0.7, 0.25), 0.3),
        Rc::new(Material::new(
            Vec3::zeros(),
            Vec3::constant(0.5529, 0.9, 0.9),
            Vec3::constant(0.1, 0.1, 0.1),
            Vec3::zeros(),
        )),
    );

    (scene, right_wall)
}

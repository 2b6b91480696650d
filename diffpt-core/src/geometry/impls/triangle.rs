//! Ray/triangle intersection (Möller–Trumbore).

use crate::autograd::{AutogradError, ScalarNode, Value, Vec3};
use crate::geometry::{Intersection, Ray, Shape};

/// A triangle with an explicit shading normal.
///
/// The normal is used as given; it is not recomputed from the winding.
#[derive(Clone, Debug)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    normal: Vec3,
}

impl Triangle {
    #[must_use]
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, normal: Vec3) -> Self {
        Triangle { v0, v1, v2, normal }
    }
}

impl Shape for Triangle {
    fn intersect(&self, ray: &Ray) -> Result<Option<Intersection>, AutogradError> {
        let e1 = &self.v1 - &self.v0;
        let e2 = &self.v2 - &self.v0;
        let ray_x_e2 = ray.direction.cross(&e2);
        let det = e1.dot(&ray_x_e2);
        // Parallel to the plane.
        if det.value().abs() < f64::EPSILON {
            return Ok(None);
        }
        let inv_det = (&Value::constant(1.0) / &det)?;

        // Cramer's rule on o - v0 = -t d + u e1 + v e2.
        let s = &ray.origin - &self.v0;
        let u = &s.dot(&ray_x_e2) * &inv_det;
        if !(0.0..=1.0).contains(&u.value()) {
            return Ok(None);
        }
        let s_x_e1 = s.cross(&e1);
        let v = &ray.direction.dot(&s_x_e1) * &inv_det;
        if v.value() < 0.0 || u.value() + v.value() > 1.0 {
            return Ok(None);
        }

        let t = &e2.dot(&s_x_e1) * &inv_det;
        if t.value() < f64::EPSILON {
            return Ok(None);
        }
        Ok(Some(Intersection::new(ray, t, self.normal.clone())))
    }
}

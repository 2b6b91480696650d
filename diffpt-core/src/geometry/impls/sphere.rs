//! Ray/sphere intersection.

use crate::autograd::{AutogradError, ScalarNode, Value, Vec3};
use crate::geometry::{Intersection, Ray, Shape};

#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
}

impl Sphere {
    #[must_use]
    pub fn new(center: Vec3, radius: f64) -> Self {
        Sphere { center, radius }
    }
}

impl Shape for Sphere {
    /// Solves the quadratic with the sign-adjusted formula, which avoids cancellation
    /// between `b` and the root of the discriminant.
    fn intersect(&self, ray: &Ray) -> Result<Option<Intersection>, AutogradError> {
        let f = &ray.origin - &self.center;
        let r2 = self.radius * self.radius;

        let b = (-&f).dot(&ray.direction);
        let c = &f.dot(&f) - r2;
        let l = &f + &(&ray.direction * &b);
        let discriminant = r2 - &l.dot(&l);
        if discriminant.value() < 0.0 {
            return Ok(None);
        }

        let sign = if b.value() >= 0.0 { 1.0 } else { -1.0 };
        let q = &b + &(&discriminant.sqrt() * sign);
        // Tangent ray grazing the sphere at its own origin.
        if q.value() == 0.0 {
            return Ok(None);
        }

        let mut t0 = (&c / &q)?;
        let mut t1 = q;
        if t1.value() < t0.value() {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t1.value() <= 0.0 {
            return Ok(None);
        }
        let t: Value = if t0.value() <= 0.0 { t1 } else { t0 };

        let point = ray.at(&t);
        let normal = (&point - &self.center).normalize()?;
        Ok(Some(Intersection::new(ray, t, normal)))
    }
}

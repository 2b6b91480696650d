//! Rays, hit records and the [`Shape`] intersection contract.

pub mod impls;

pub use impls::sphere::Sphere;
pub use impls::triangle::Triangle;

use crate::autograd::{AutogradError, ScalarNode, Value, Vec3};

/// A ray with a unit-length direction.
#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Builds a ray, normalizing `direction`.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::DivisionByZero`] for a zero direction.
    pub fn new(origin: Vec3, direction: &Vec3) -> Result<Self, AutogradError> {
        Ok(Ray {
            origin,
            direction: direction.normalize()?,
        })
    }

    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: &Value) -> Vec3 {
        &self.origin + &(&self.direction * t)
    }
}

/// Geometric part of a ray/surface hit.
#[derive(Clone, Debug)]
pub struct Intersection {
    pub point: Vec3,
    /// Unit shading normal.
    pub normal: Vec3,
    /// Direction back toward the ray origin (`-ray.direction`).
    pub wo: Vec3,
    /// Ray parameter of the hit.
    pub t: Value,
    /// `true` when the ray arrives against the normal.
    pub entering: bool,
}

impl Intersection {
    #[must_use]
    pub fn new(ray: &Ray, t: Value, normal: Vec3) -> Self {
        let entering = normal.dot(&ray.direction).value() < 0.0;
        Intersection {
            point: ray.at(&t),
            normal,
            wo: -&ray.direction,
            t,
            entering,
        }
    }
}

/// A primitive that can be hit by a ray.
pub trait Shape {
    /// Nearest hit in front of the ray origin, or `None`.
    ///
    /// # Errors
    ///
    /// Propagates [`AutogradError`] from degenerate geometry (zero normals and the like).
    fn intersect(&self, ray: &Ray) -> Result<Option<Intersection>, AutogradError>;
}

//! Scene container: shapes with shared materials, point lights, closest-hit queries.

pub mod cornell;
#[cfg(test)]
mod tests;

use std::fmt;
use std::rc::Rc;

use crate::autograd::{AutogradError, ScalarNode, Vec3};
use crate::geometry::{Intersection, Ray, Shape};
use crate::material::Material;

/// A shape paired with its material. Several objects may share one material.
pub struct Object {
    pub shape: Box<dyn Shape>,
    pub material: Rc<Material>,
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

/// Isotropic point light.
#[derive(Clone, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub power: Vec3,
}

/// Direct illumination from one point light at a shading point.
#[derive(Clone, Debug)]
pub struct LightSample {
    /// Unit direction from the shading point toward the light.
    pub direction: Vec3,
    /// `power * max(0, n . wi) / distance^2`.
    pub irradiance: Vec3,
}

/// Closest hit along a ray, with the material of the object hit.
#[derive(Clone, Debug)]
pub struct Hit<'a> {
    pub intersection: Intersection,
    pub material: &'a Material,
}

#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Object>,
    lights: Vec<PointLight>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn add_shape(&mut self, shape: impl Shape + 'static, material: Rc<Material>) {
        self.objects.push(Object {
            shape: Box::new(shape),
            material,
        });
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    #[must_use]
    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Closest hit among all objects. On equal `t` the object added first wins.
    ///
    /// # Errors
    ///
    /// Propagates [`AutogradError`] from any shape's intersection routine.
    pub fn intersect(&self, ray: &Ray) -> Result<Option<Hit<'_>>, AutogradError> {
        let mut closest: Option<Hit<'_>> = None;
        for object in &self.objects {
            let Some(intersection) = object.shape.intersect(ray)? else {
                continue;
            };
            let nearer = closest
                .as_ref()
                .is_none_or(|best| intersection.t.value() < best.intersection.t.value());
            if nearer {
                closest = Some(Hit {
                    intersection,
                    material: &object.material,
                });
            }
        }
        Ok(closest)
    }

    /// Next-event estimation toward every point light.
    ///
    /// Visibility is not tested: a light behind an occluder still contributes. The
    /// returned samples carry no gradient.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::DivisionByZero`] when a light sits exactly on the shading point.
    pub fn point_light_nee(&self, hit: &Intersection) -> Result<Vec<LightSample>, AutogradError> {
        self.lights()
            .iter()
            .map(|light| {
                let to_light = (&light.position - &hit.point).detach();
                let distance_squared = to_light.norm_squared();
                let direction = to_light.normalize()?;
                let cos_theta = hit.normal.dot(&direction).value().max(0.0);
                let irradiance = (&(&light.power.detach() * cos_theta) / &distance_squared)?;
                Ok(LightSample {
                    direction,
                    irradiance,
                })
            })
            .collect()
    }
}

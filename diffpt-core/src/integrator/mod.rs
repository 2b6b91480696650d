//! Differentiable recursive path tracing.
//!
//! Every quantity the integrator produces is a graph over the scene's material weights.
//! Dividing a lobe's BSDF value by its Russian-roulette probability keeps the estimator
//! unbiased and is also the edge through which pixel gradients reach the weights.

mod error;
#[cfg(test)]
mod tests;

pub use error::RenderError;

use std::f64::consts::PI;

use rand::Rng;

use crate::autograd::{AutogradError, ScalarNode, Vec3};
use crate::camera::Camera;
use crate::geometry::Ray;
use crate::image::Image;
use crate::scene::Scene;

/// Offset applied along the normal when spawning a bounce ray.
pub const DEFAULT_RAY_EPSILON: f64 = 1e-4;

/// Path tracer settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathIntegrator {
    /// Hard bounce cap; a path reaching it contributes black.
    pub max_depth: u32,
    pub samples_per_pixel: u32,
    pub ray_epsilon: f64,
}

impl PathIntegrator {
    #[must_use]
    pub fn new(max_depth: u32, samples_per_pixel: u32) -> Self {
        PathIntegrator {
            max_depth,
            samples_per_pixel,
            ray_epsilon: DEFAULT_RAY_EPSILON,
        }
    }

    #[must_use]
    pub fn with_ray_epsilon(mut self, ray_epsilon: f64) -> Self {
        self.ray_epsilon = ray_epsilon;
        self
    }

    /// Radiance arriving along `ray` with at most `depth` surface interactions.
    ///
    /// Emitters end the path and return their emission. Other surfaces pick a lobe by
    /// Russian roulette, recurse along a sampled direction and add next-event estimation
    /// toward the scene's point lights.
    ///
    /// # Errors
    ///
    /// Propagates [`AutogradError`] from degenerate geometry.
    pub fn li<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        ray: &Ray,
        depth: u32,
        rng: &mut R,
    ) -> Result<Vec3, AutogradError> {
        if depth == 0 {
            return Ok(Vec3::zeros());
        }
        let Some(hit) = scene.intersect(ray)? else {
            return Ok(Vec3::zeros());
        };
        let material = hit.material;
        if material.is_emissive() {
            return Ok(material.emission().clone());
        }
        let Some(event) = material.russian_roulette(rng) else {
            return Ok(Vec3::zeros());
        };

        let bsdf = event.bsdf;
        let surface = &hit.intersection;
        let (n, wo) = (&surface.normal, &surface.wo);

        let wi = bsdf.sample(wo, n, rng)?;
        let fr = (&bsdf.evaluate(wo, &wi, n)? / event.probability)?;
        let cos_theta_i = bsdf.cos_theta_i(&wi, n);
        let pdf = bsdf.pdf(wo, &wi, n);

        // Spawn on the side of the surface the new direction leaves through.
        let offset = if wi.dot(n).value() < 0.0 {
            -self.ray_epsilon
        } else {
            self.ray_epsilon
        };
        let bounce = Ray::new(&surface.point + &(n * offset), &wi)?;
        let incoming = self.li(scene, &bounce, depth - 1, rng)?;
        let mut radiance = &(&incoming * &fr) * (PI * cos_theta_i / pdf);

        for light in scene.point_light_nee(surface)? {
            let f_light = (&bsdf.evaluate(wo, &light.direction, n)? / event.probability)?;
            radiance = &radiance + &(&f_light * &light.irradiance);
        }
        Ok(radiance)
    }

    /// Renders a `width` x `height` image, averaging `samples_per_pixel` jittered paths per
    /// pixel. Each sample builds its own graph branch.
    ///
    /// # Errors
    ///
    /// - [`RenderError::InvalidSettings`] for a zero dimension or sample count.
    /// - [`RenderError::Autograd`] from a degenerate camera ray or path.
    pub fn render<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        camera: &Camera,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<Image, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSettings("image dimensions must be positive"));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings("samples per pixel must be positive"));
        }

        let spp = f64::from(self.samples_per_pixel);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let mut sum = Vec3::zeros();
                for _ in 0..self.samples_per_pixel {
                    let u = (x as f64 + rng.random::<f64>()) / width as f64;
                    let v = (y as f64 + rng.random::<f64>()) / height as f64;
                    let ray = camera.ray(u, v)?;
                    sum = &sum + &self.li(scene, &ray, self.max_depth, rng)?;
                }
                pixels.push((&sum / spp)?);
            }
        }
        log::debug!(
            "rendered {width}x{height} at {} spp, depth {}",
            self.samples_per_pixel,
            self.max_depth
        );
        Ok(Image::new(width, height, pixels)?)
    }
}

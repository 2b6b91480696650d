//! Pinhole camera producing primary rays from normalized image coordinates.

use crate::autograd::{AutogradError, Vec3};
use crate::geometry::Ray;

/// Pinhole camera. `forward`, `up` and `left` are not required to be unit length; their
/// lengths set the field of view.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub left: Vec3,
}

impl Default for Camera {
    /// Looks down +z at the Cornell box from `z = -3`.
    fn default() -> Self {
        Camera {
            eye: Vec3::constant(0.0, 0.0, -3.0),
            forward: Vec3::constant(0.0, 0.0, 3.0),
            up: Vec3::constant(0.0, 1.0, 0.0),
            left: Vec3::constant(-1.0, 0.0, 0.0),
        }
    }
}

impl Camera {
    /// Ray through image coordinates `(u, v)` in `[0, 1]`, with `(0, 0)` the top-left corner.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::DivisionByZero`] if the basis vectors cancel to a zero direction.
    pub fn ray(&self, u: f64, v: f64) -> Result<Ray, AutogradError> {
        let direction =
            &(&self.forward + &(&self.left * (1.0 - 2.0 * u))) + &(&self.up * (1.0 - 2.0 * v));
        Ray::new(self.eye.clone(), &direction)
    }
}

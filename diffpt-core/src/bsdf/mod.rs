//! Scattering lobes: diffuse, specular and refractive BSDFs carrying a differentiable weight.
//!
//! The sampling strategies are chosen so that `pdf` and `cos_theta_i` cancel against the
//! rendering equation's cosine term and are the constant 1 for every lobe:
//!
//! - diffuse lobes importance-sample the cosine exactly, so `cos / pdf` is π (applied by the
//!   integrator) and both methods return 1;
//! - specular and refractive lobes are delta distributions whose cosine and density are
//!   folded into the weight.

use std::f64::consts::{FRAC_1_PI, PI};

use rand::Rng;

use crate::autograd::{AutogradError, ScalarNode, Vec3};

/// Lobe tag, in Russian-roulette selection order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lobe {
    Diffuse,
    Specular,
    Refractive,
}

impl Lobe {
    /// All lobes in selection order.
    pub const ALL: [Lobe; 3] = [Lobe::Diffuse, Lobe::Specular, Lobe::Refractive];
}

/// One scattering lobe of a material.
#[derive(Clone, Debug)]
pub enum Bsdf {
    /// Lambertian reflection, sampled proportionally to the cosine.
    Diffuse { weight: Vec3 },
    /// Perfect mirror.
    Specular { weight: Vec3 },
    /// Perfect transmission between indices `n1` (outside) and `n2` (inside).
    Refractive { weight: Vec3, n1: f64, n2: f64 },
}

impl Bsdf {
    #[must_use]
    pub fn lobe(&self) -> Lobe {
        match self {
            Bsdf::Diffuse { .. } => Lobe::Diffuse,
            Bsdf::Specular { .. } => Lobe::Specular,
            Bsdf::Refractive { .. } => Lobe::Refractive,
        }
    }

    /// The lobe's colour weight. Its channels are the handles an optimizer registers.
    #[must_use]
    pub fn weight(&self) -> &Vec3 {
        match self {
            Bsdf::Diffuse { weight } | Bsdf::Specular { weight } => weight,
            Bsdf::Refractive { weight, .. } => weight,
        }
    }

    /// BSDF value for outgoing `wo` and incoming `wi` around normal `n`.
    ///
    /// Delta lobes return their weight only when `wi` is exactly the direction they sample.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::DivisionByZero`] for a refractive lobe with a zero index.
    pub fn evaluate(&self, wo: &Vec3, wi: &Vec3, n: &Vec3) -> Result<Vec3, AutogradError> {
        match self {
            Bsdf::Diffuse { weight } => Ok(weight * FRAC_1_PI),
            Bsdf::Specular { weight } => Ok(delta_match(weight, wi, &reflect(&-wo, n))),
            Bsdf::Refractive { weight, n1, n2 } => {
                Ok(delta_match(weight, wi, &refract(&-wo, n, *n1, *n2)?))
            }
        }
    }

    /// Samples an incoming direction for outgoing `wo` around normal `n`.
    ///
    /// # Errors
    ///
    /// - [`AutogradError::DivisionByZero`] for a zero normal or a zero refractive index.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        wo: &Vec3,
        n: &Vec3,
        rng: &mut R,
    ) -> Result<Vec3, AutogradError> {
        match self {
            Bsdf::Diffuse { .. } => sample_cosine_hemisphere(n, rng.random(), rng.random()),
            Bsdf::Specular { .. } => Ok(reflect(&-wo, n)),
            Bsdf::Refractive { n1, n2, .. } => refract(&-wo, n, *n1, *n2),
        }
    }

    /// Sampling density; cancelled analytically for every lobe.
    #[must_use]
    pub fn pdf(&self, _wo: &Vec3, _wi: &Vec3, _n: &Vec3) -> f64 {
        1.0
    }

    /// Cosine factor of the rendering equation; cancelled analytically for every lobe.
    #[must_use]
    pub fn cos_theta_i(&self, _wi: &Vec3, _n: &Vec3) -> f64 {
        1.0
    }
}

fn delta_match(weight: &Vec3, wi: &Vec3, expected: &Vec3) -> Vec3 {
    if wi == expected {
        weight.clone()
    } else {
        Vec3::zeros()
    }
}

/// Mirrors incident direction `d` about `n`.
#[must_use]
pub fn reflect(d: &Vec3, n: &Vec3) -> Vec3 {
    d - &(&(n * 2.0) * &n.dot(d))
}

/// Transmits incident direction `d` through a surface with normal `n` (Snell's law).
///
/// `n1` is the index on the side `n` points to. A ray arriving from the inside sees the
/// indices swapped and the normal flipped. Total internal reflection falls back to
/// [`reflect`].
///
/// # Errors
///
/// - [`AutogradError::DivisionByZero`] when either index is zero.
pub fn refract(d: &Vec3, n: &Vec3, n1: f64, n2: f64) -> Result<Vec3, AutogradError> {
    if n1 == 0.0 || n2 == 0.0 {
        return Err(AutogradError::DivisionByZero);
    }
    let cos_i = -&n.dot(d);
    let (cos_i, normal, eta) = if cos_i.value() < 0.0 {
        (-&cos_i, -n, n2 / n1)
    } else {
        (cos_i, n.clone(), n1 / n2)
    };
    let sin2_t = &(1.0 - &(&cos_i * &cos_i)) * (eta * eta);
    if sin2_t.value() > 1.0 {
        return Ok(reflect(d, n));
    }
    let cos_t = (1.0 - &sin2_t).sqrt();
    Ok(&(d * eta) + &(&normal * &(&(&cos_i * eta) - &cos_t)))
}

/// Cosine-weighted direction in the hemisphere around `n` from two uniform draws.
fn sample_cosine_hemisphere(n: &Vec3, u1: f64, u2: f64) -> Result<Vec3, AutogradError> {
    let theta = (1.0 - u1).sqrt().acos();
    let phi = 2.0 * PI * u2;

    let [nx, ny, nz] = n.values();
    let tangent = if nx.abs() > ny.abs() {
        (&Vec3::constant(-nz, 0.0, nx) / (nx * nx + nz * nz).sqrt())?
    } else {
        (&Vec3::constant(0.0, nz, -ny) / (ny * ny + nz * nz).sqrt())?
    };
    let bitangent = n.cross(&tangent);

    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Ok(&(&(&tangent * (sin_theta * cos_phi)) + &(&bitangent * (sin_theta * sin_phi)))
        + &(n * cos_theta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn assert_vec_close(a: &Vec3, b: [f64; 3]) {
        for (x, y) in a.values().into_iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{a} vs {b:?}");
        }
    }

    #[test]
    fn diffuse_evaluate_is_weight_over_pi() {
        let bsdf = Bsdf::Diffuse {
            weight: Vec3::constant(0.5, 0.25, 1.0),
        };
        let n = Vec3::constant(0.0, 1.0, 0.0);
        let f = bsdf.evaluate(&n, &n, &n).unwrap();
        assert_vec_close(&f, [0.5 / PI, 0.25 / PI, 1.0 / PI]);
        assert_eq!(bsdf.pdf(&n, &n, &n), 1.0);
        assert_eq!(bsdf.cos_theta_i(&n, &n), 1.0);
    }

    #[test]
    fn diffuse_evaluate_propagates_gradient_to_weight() {
        let weight = Vec3::parameter(0.2, 0.4, 0.6);
        let bsdf = Bsdf::Diffuse {
            weight: weight.clone(),
        };
        let n = Vec3::constant(0.0, 0.0, 1.0);
        bsdf.evaluate(&n, &n, &n).unwrap().z.backward();
        assert_eq!(weight.grads(), [0.0, 0.0, FRAC_1_PI]);
    }

    #[test]
    fn diffuse_samples_are_unit_and_in_the_upper_hemisphere() {
        let mut rng = StdRng::seed_from_u64(7);
        let bsdf = Bsdf::Diffuse {
            weight: Vec3::constant(1.0, 1.0, 1.0),
        };
        let normals = [
            Vec3::constant(0.0, 1.0, 0.0),
            Vec3::constant(-1.0, 0.0, 0.0),
            Vec3::constant(0.0, 0.0, -1.0),
            Vec3::constant(0.48, 0.6, 0.64),
        ];
        for n in &normals {
            let wo = n.clone();
            for _ in 0..200 {
                let wi = bsdf.sample(&wo, n, &mut rng).unwrap();
                assert!((wi.norm().value() - 1.0).abs() < 1e-9);
                assert!(wi.dot(n).value() >= -1e-12);
            }
        }
    }

    #[test]
    fn diffuse_samples_are_cosine_distributed() {
        // E[cos theta] = 2/3 under a cosine-weighted hemisphere density.
        let mut rng = StdRng::seed_from_u64(11);
        let bsdf = Bsdf::Diffuse {
            weight: Vec3::constant(1.0, 1.0, 1.0),
        };
        let n = Vec3::constant(0.0, 1.0, 0.0);
        let draws = 20_000;
        let mean = (0..draws)
            .map(|_| bsdf.sample(&n, &n, &mut rng).unwrap().dot(&n).value())
            .sum::<f64>()
            / f64::from(draws);
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean cos = {mean}");
    }

    #[test]
    fn diffuse_sample_rejects_zero_normal() {
        let mut rng = StdRng::seed_from_u64(1);
        let bsdf = Bsdf::Diffuse {
            weight: Vec3::constant(1.0, 1.0, 1.0),
        };
        let n = Vec3::zeros();
        assert_eq!(
            bsdf.sample(&n, &n, &mut rng).unwrap_err(),
            AutogradError::DivisionByZero
        );
    }

    #[test]
    fn specular_samples_the_mirror_direction() {
        let mut rng = StdRng::seed_from_u64(3);
        let bsdf = Bsdf::Specular {
            weight: Vec3::constant(0.9, 0.9, 0.9),
        };
        let s = 1.0 / 2f64.sqrt();
        let n = Vec3::constant(0.0, 1.0, 0.0);
        let wo = Vec3::constant(-s, s, 0.0);
        let wi = bsdf.sample(&wo, &n, &mut rng).unwrap();
        assert_vec_close(&wi, [s, s, 0.0]);
        assert_eq!(bsdf.evaluate(&wo, &wi, &n).unwrap().values(), [0.9, 0.9, 0.9]);
        let off = Vec3::constant(0.0, 1.0, 0.0);
        assert_eq!(bsdf.evaluate(&wo, &off, &n).unwrap().values(), [0.0; 3]);
    }

    #[test]
    fn refraction_with_matched_indices_passes_straight_through() {
        let d = Vec3::constant(0.6, -0.8, 0.0);
        let n = Vec3::constant(0.0, 1.0, 0.0);
        let t = refract(&d, &n, 1.0, 1.0).unwrap();
        assert_vec_close(&t, [0.6, -0.8, 0.0]);
    }

    #[test]
    fn refraction_into_glass_follows_snell() {
        let d = Vec3::constant(0.6, -0.8, 0.0);
        let n = Vec3::constant(0.0, 1.0, 0.0);
        let t = refract(&d, &n, 1.0, 1.5).unwrap();
        assert!((t.norm().value() - 1.0).abs() < 1e-9);
        // sin(theta_t) = sin(theta_i) / 1.5
        assert!((t.x.value() - 0.6 / 1.5).abs() < 1e-9);
        assert!(t.y.value() < 0.0);
    }

    #[test]
    fn refraction_out_of_glass_past_critical_angle_reflects() {
        // Leaving glass (d along n) at sin(theta) = 0.8 > 1/1.5.
        let d = Vec3::constant(0.8, 0.6, 0.0);
        let n = Vec3::constant(0.0, 1.0, 0.0);
        let t = refract(&d, &n, 1.0, 1.5).unwrap();
        assert_vec_close(&t, [0.8, -0.6, 0.0]);
    }

    #[test]
    fn refractive_evaluate_matches_its_own_sample() {
        let mut rng = StdRng::seed_from_u64(5);
        let bsdf = Bsdf::Refractive {
            weight: Vec3::constant(1.0, 1.0, 1.0),
            n1: 1.0,
            n2: 1.5,
        };
        let n = Vec3::constant(0.0, 1.0, 0.0);
        let wo = Vec3::constant(-0.6, 0.8, 0.0);
        let wi = bsdf.sample(&wo, &n, &mut rng).unwrap();
        assert_eq!(bsdf.evaluate(&wo, &wi, &n).unwrap().values(), [1.0; 3]);
        assert_eq!(bsdf.evaluate(&wo, &n, &n).unwrap().values(), [0.0; 3]);
    }

    #[test]
    fn refraction_rejects_zero_index() {
        let d = Vec3::constant(0.0, -1.0, 0.0);
        let n = Vec3::constant(0.0, 1.0, 0.0);
        assert_eq!(
            refract(&d, &n, 1.0, 0.0).unwrap_err(),
            AutogradError::DivisionByZero
        );
    }

    #[test]
    fn lobes_report_their_tag() {
        let w = Vec3::zeros();
        assert_eq!(Bsdf::Diffuse { weight: w.clone() }.lobe(), Lobe::Diffuse);
        assert_eq!(Bsdf::Specular { weight: w.clone() }.lobe(), Lobe::Specular);
        let r = Bsdf::Refractive {
            weight: w,
            n1: 1.0,
            n2: 1.5,
        };
        assert_eq!(r.lobe(), Lobe::Refractive);
    }
}

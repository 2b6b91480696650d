//! Surface materials: an emission term plus three BSDF lobes picked by Russian roulette.


use rand::Rng;

use crate::autograd::Vec3;
use crate::bsdf::{Bsdf, Lobe};

/// Default refractive index outside a surface.
pub const DEFAULT_N1: f64 = 1.0;
/// Default refractive index inside a surface.
pub const DEFAULT_N2: f64 = 1.5;

/// Outcome of a Russian-roulette draw: the chosen lobe and its unconditional probability.
#[derive(Clone, Copy, Debug)]
pub struct BsdfEvent<'a> {
    pub bsdf: &'a Bsdf,
    pub probability: f64,
}

/// A surface material.
///
/// Lobe probabilities are the largest channel of each lobe's weight, frozen at construction.
/// Editing a weight afterwards (an optimizer step, a scene reset) changes what the lobe
/// returns but not how often it is chosen.
#[derive(Clone, Debug)]
pub struct Material {
    emission: Vec3,
    lobes: [Bsdf; 3],
    probabilities: [f64; 3],
}

impl Material {
    /// Builds a material with the default refractive indices.
    #[must_use]
    pub fn new(emission: Vec3, kd: Vec3, ks: Vec3, kr: Vec3) -> Self {
        Material::with_indices(emission, kd, ks, kr, DEFAULT_N1, DEFAULT_N2)
    }

    /// Builds a material, renormalizing the lobes if their probabilities sum above one.
    ///
    /// Renormalized weights are new leaves holding the scaled values; they track gradients
    /// if the authored weight did.
    #[must_use]
    pub fn with_indices(emission: Vec3, kd: Vec3, ks: Vec3, kr: Vec3, n1: f64, n2: f64) -> Self {
        let mut probabilities = [kd.max(), ks.max(), kr.max()];
        let total: f64 = probabilities.iter().sum();

        let (kd, ks, kr) = if total > 1.0 {
            log::warn!("lobe probabilities sum to {total}, normalizing");
            for p in &mut probabilities {
                *p /= total;
            }
            (
                rescaled(&kd, total),
                rescaled(&ks, total),
                rescaled(&kr, total),
            )
        } else {
            (kd, ks, kr)
        };

        Material {
            emission,
            lobes: [
                Bsdf::Diffuse { weight: kd },
                Bsdf::Specular { weight: ks },
                Bsdf::Refractive { weight: kr, n1, n2 },
            ],
            probabilities,
        }
    }

    /// Non-emissive, purely diffuse material.
    #[must_use]
    pub fn diffuse(kd: Vec3) -> Self {
        Material::new(Vec3::zeros(), kd, Vec3::zeros(), Vec3::zeros())
    }

    /// Light source with no scattering lobes.
    #[must_use]
    pub fn emitter(emission: Vec3) -> Self {
        Material::new(emission, Vec3::zeros(), Vec3::zeros(), Vec3::zeros())
    }

    #[must_use]
    pub fn emission(&self) -> &Vec3 {
        &self.emission
    }

    /// Returns `true` if any emission channel is positive.
    #[must_use]
    pub fn is_emissive(&self) -> bool {
        self.emission.values().iter().any(|&c| c > 0.0)
    }

    #[must_use]
    pub fn bsdf(&self, lobe: Lobe) -> &Bsdf {
        &self.lobes[lobe_index(lobe)]
    }

    #[must_use]
    pub fn probability(&self, lobe: Lobe) -> f64 {
        self.probabilities[lobe_index(lobe)]
    }

    /// Diffuse, specular and refractive probabilities, in that order.
    #[must_use]
    pub fn probabilities(&self) -> [f64; 3] {
        self.probabilities
    }

    /// Picks a lobe for the uniform draw `p`, or `None` for absorption.
    ///
    /// Thresholds are cumulative in diffuse, specular, refractive order.
    #[must_use]
    pub fn select(&self, p: f64) -> Option<BsdfEvent<'_>> {
        let mut threshold = 0.0;
        for lobe in Lobe::ALL {
            let probability = self.probability(lobe);
            threshold += probability;
            if p < threshold {
                return Some(BsdfEvent {
                    bsdf: self.bsdf(lobe),
                    probability,
                });
            }
        }
        None
    }

    /// Draws `p` uniformly in `[0, 1)` and selects a lobe.
    pub fn russian_roulette<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<BsdfEvent<'_>> {
        self.select(rng.random::<f64>())
    }
}

fn lobe_index(lobe: Lobe) -> usize {
    match lobe {
        Lobe::Diffuse => 0,
        Lobe::Specular => 1,
        Lobe::Refractive => 2,
    }
}

fn rescaled(weight: &Vec3, total: f64) -> Vec3 {
    Vec3::from_values(weight.values().map(|c| c / total), weight.is_tracked())
}

//! # diffpt-core
//!
//! Differentiable Monte-Carlo path tracing: scalar reverse-mode autograd, a recursive
//! path integrator with Russian-roulette lobe selection and point-light sampling, and
//! gradient-based optimizers that fit scene parameters to a target image.

pub mod autograd;
pub mod bsdf;
pub mod camera;
pub mod config;
pub mod geometry;
pub mod image;
pub mod integrator;
pub mod material;
pub mod optim;
pub mod scene;
pub mod training;

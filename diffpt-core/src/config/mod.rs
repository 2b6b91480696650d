//! Configuration for rendering, optimization and output.
//!
//! Load from environment via [`from_env`] and validate with [`Config::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use constants::{
    DEFAULT_HEIGHT, DEFAULT_L2, DEFAULT_LEARNING_RATE, DEFAULT_LOSS_LOG_EVERY, DEFAULT_MAX_DEPTH,
    DEFAULT_MOMENTUM, DEFAULT_NUM_STEPS, DEFAULT_OUTPUT_DIR, DEFAULT_SAMPLES_PER_PIXEL,
    DEFAULT_SEED, DEFAULT_SNAPSHOT_EVERY, DEFAULT_WIDTH,
};

use crate::integrator::{PathIntegrator, DEFAULT_RAY_EPSILON};
use crate::optim::impls::adam::{DEFAULT_BETA1, DEFAULT_BETA2, DEFAULT_EPSILON};

pub use builder::{env_key, env_parsed, env_string, from_env};
pub use error::ConfigError;

/// Which optimizer drives the reflectance update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizerKind {
    Adam,
    Sgd,
}

impl FromStr for OptimizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "adam" => Ok(OptimizerKind::Adam),
            "sgd" => Ok(OptimizerKind::Sgd),
            other => Err(format!("unknown optimizer `{other}` (expected adam or sgd)")),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::Adam => f.write_str("adam"),
            OptimizerKind::Sgd => f.write_str("sgd"),
        }
    }
}

/// Central configuration for the diffpt pipeline.
///
/// Use [`from_env`] to build from environment variables and [`Config::validate`] before use.
#[derive(Clone, Debug)]
pub struct Config {
    /// Seed for the render RNG (reproducibility).
    pub seed: u64,

    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Jittered paths averaged per pixel.
    pub samples_per_pixel: u32,
    /// Bounce cap for every path.
    pub max_depth: u32,
    /// Offset along the normal for bounce rays.
    pub ray_epsilon: f64,

    pub optimizer: OptimizerKind,
    pub learning_rate: f64,
    /// L2 weight added to the gradient (0 = disabled).
    pub l2: f64,
    /// SGD momentum (0 = plain gradient descent).
    pub momentum: f64,
    /// Adam beta1.
    pub beta1: f64,
    /// Adam beta2.
    pub beta2: f64,
    /// Adam epsilon.
    pub epsilon: f64,

    /// Number of optimization steps.
    pub num_steps: usize,
    /// Log loss every this many steps.
    pub loss_log_every: usize,
    /// Write a snapshot every this many steps (0 = only the target image).
    pub snapshot_every: usize,
    /// Directory receiving PPM snapshots.
    pub output_dir: PathBuf,
}

impl Default for Config {
    /// Returns default configuration (suitable for tests and fallbacks).
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            samples_per_pixel: DEFAULT_SAMPLES_PER_PIXEL,
            max_depth: DEFAULT_MAX_DEPTH,
            ray_epsilon: DEFAULT_RAY_EPSILON,
            optimizer: OptimizerKind::Adam,
            learning_rate: DEFAULT_LEARNING_RATE,
            l2: DEFAULT_L2,
            momentum: DEFAULT_MOMENTUM,
            beta1: DEFAULT_BETA1,
            beta2: DEFAULT_BETA2,
            epsilon: DEFAULT_EPSILON,
            num_steps: DEFAULT_NUM_STEPS,
            loss_log_every: DEFAULT_LOSS_LOG_EVERY,
            snapshot_every: DEFAULT_SNAPSHOT_EVERY,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation(message.to_string())
}

impl Config {
    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    ///
    /// Float checks are written so that NaN fails them.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("width and height must be greater than 0"));
        }
        if self.samples_per_pixel == 0 {
            return Err(invalid("samples_per_pixel must be greater than 0"));
        }
        if self.max_depth == 0 {
            return Err(invalid("max_depth must be greater than 0"));
        }
        if self.num_steps == 0 {
            return Err(invalid("num_steps must be greater than 0"));
        }
        if self.loss_log_every == 0 {
            return Err(invalid("loss_log_every must be greater than 0"));
        }
        if !(self.ray_epsilon > 0.0) {
            return Err(invalid("ray_epsilon must be greater than 0"));
        }
        if !(self.learning_rate > 0.0) {
            return Err(invalid("learning_rate must be greater than 0"));
        }
        if !(self.l2 >= 0.0) {
            return Err(invalid("l2 must be non-negative"));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(invalid("momentum must be in [0, 1)"));
        }
        if !(0.0..1.0).contains(&self.beta1) || !(0.0..1.0).contains(&self.beta2) {
            return Err(invalid("beta1 and beta2 must be in [0, 1)"));
        }
        if !(self.epsilon > 0.0) {
            return Err(invalid("epsilon must be greater than 0"));
        }
        Ok(())
    }

    /// Path integrator with this configuration's depth, sample count and ray offset.
    #[must_use]
    pub fn integrator(&self) -> PathIntegrator {
        PathIntegrator::new(self.max_depth, self.samples_per_pixel)
            .with_ray_epsilon(self.ray_epsilon)
    }
}

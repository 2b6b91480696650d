//! Build [`Config`] from environment variables.
//!
//! Uses [`env_string`] and [`env_parsed`] to read env vars with a single place for key names
//! (see [`crate::config::constants`]) and typed errors ([`ConfigError`]).

use std::path::PathBuf;

use super::constants::{
    ENV_BETA1, ENV_BETA2, ENV_EPSILON, ENV_HEIGHT, ENV_L2, ENV_LEARNING_RATE,
    ENV_LOSS_LOG_EVERY, ENV_MAX_DEPTH, ENV_MOMENTUM, ENV_NUM_STEPS, ENV_OPTIMIZER,
    ENV_OUTPUT_DIR, ENV_PREFIX, ENV_RAY_EPSILON, ENV_SAMPLES_PER_PIXEL, ENV_SEED,
    ENV_SNAPSHOT_EVERY, ENV_WIDTH,
};
use super::{Config, ConfigError, OptimizerKind};

/// Returns the full environment variable key for a given suffix (e.g. `SEED` → `DIFFPT_SEED`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string.
///
/// Returns `Some(value)` if the variable is set and valid UTF-8, `None` if unset.
/// Returns `Err(ConfigError::EnvVar)` if the variable is set but not Unicode.
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads an environment variable and parses it into type `T`.
///
/// Returns `Ok(Some(value))` if set and parse succeeds, `Ok(None)` if unset, and
/// `Err(ConfigError::Parse)` if set but parsing fails (e.g. `DIFFPT_SEED=abc` for `u64`).
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    match s.trim().parse() {
        Ok(t) => Ok(Some(t)),
        Err(e) => Err(ConfigError::Parse {
            key: key.to_string(),
            value: s,
            message: e.to_string(),
        }),
    }
}

/// Builds [`Config`] from environment variables, falling back to [`Config::default`] for unset values.
///
/// Returns [`ConfigError`] if any *set* variable fails to parse. Does not validate; call
/// [`Config::validate`] on the result.
pub fn from_env() -> Result<Config, ConfigError> {
    let default = Config::default();

    let seed = env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed);
    let width = env_parsed::<usize>(&env_key(ENV_WIDTH))?.unwrap_or(default.width);
    let height = env_parsed::<usize>(&env_key(ENV_HEIGHT))?.unwrap_or(default.height);
    let samples_per_pixel =
        env_parsed::<u32>(&env_key(ENV_SAMPLES_PER_PIXEL))?.unwrap_or(default.samples_per_pixel);
    let max_depth = env_parsed::<u32>(&env_key(ENV_MAX_DEPTH))?.unwrap_or(default.max_depth);
    let ray_epsilon =
        env_parsed::<f64>(&env_key(ENV_RAY_EPSILON))?.unwrap_or(default.ray_epsilon);
    let optimizer =
        env_parsed::<OptimizerKind>(&env_key(ENV_OPTIMIZER))?.unwrap_or(default.optimizer);
    let learning_rate =
        env_parsed::<f64>(&env_key(ENV_LEARNING_RATE))?.unwrap_or(default.learning_rate);
    let l2 = env_parsed::<f64>(&env_key(ENV_L2))?.unwrap_or(default.l2);
    let momentum = env_parsed::<f64>(&env_key(ENV_MOMENTUM))?.unwrap_or(default.momentum);
    let beta1 = env_parsed::<f64>(&env_key(ENV_BETA1))?.unwrap_or(default.beta1);
    let beta2 = env_parsed::<f64>(&env_key(ENV_BETA2))?.unwrap_or(default.beta2);
    let epsilon = env_parsed::<f64>(&env_key(ENV_EPSILON))?.unwrap_or(default.epsilon);
    let num_steps = env_parsed::<usize>(&env_key(ENV_NUM_STEPS))?.unwrap_or(default.num_steps);
    let loss_log_every =
        env_parsed::<usize>(&env_key(ENV_LOSS_LOG_EVERY))?.unwrap_or(default.loss_log_every);
    let snapshot_every =
        env_parsed::<usize>(&env_key(ENV_SNAPSHOT_EVERY))?.unwrap_or(default.snapshot_every);
    let output_dir = env_string(&env_key(ENV_OUTPUT_DIR))?
        .map(PathBuf::from)
        .unwrap_or(default.output_dir);

    Ok(Config {
        seed,
        width,
        height,
        samples_per_pixel,
        max_depth,
        ray_epsilon,
        optimizer,
        learning_rate,
        l2,
        momentum,
        beta1,
        beta2,
        epsilon,
        num_steps,
        loss_log_every,
        snapshot_every,
        output_dir,
    })
}

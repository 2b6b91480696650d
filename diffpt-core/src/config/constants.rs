//! Central place for all configuration constants.
//!
//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `DIFFPT_WIDTH`).
pub(crate) const ENV_PREFIX: &str = "DIFFPT_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_SEED: &str = "SEED";
pub(crate) const ENV_WIDTH: &str = "WIDTH";
pub(crate) const ENV_HEIGHT: &str = "HEIGHT";
pub(crate) const ENV_SAMPLES_PER_PIXEL: &str = "SAMPLES_PER_PIXEL";
pub(crate) const ENV_MAX_DEPTH: &str = "MAX_DEPTH";
pub(crate) const ENV_RAY_EPSILON: &str = "RAY_EPSILON";
pub(crate) const ENV_OPTIMIZER: &str = "OPTIMIZER";
pub(crate) const ENV_LEARNING_RATE: &str = "LEARNING_RATE";
pub(crate) const ENV_L2: &str = "L2";
pub(crate) const ENV_MOMENTUM: &str = "MOMENTUM";
pub(crate) const ENV_BETA1: &str = "BETA1";
pub(crate) const ENV_BETA2: &str = "BETA2";
pub(crate) const ENV_EPSILON: &str = "EPSILON";
pub(crate) const ENV_NUM_STEPS: &str = "NUM_STEPS";
pub(crate) const ENV_LOSS_LOG_EVERY: &str = "LOSS_LOG_EVERY";
pub(crate) const ENV_SNAPSHOT_EVERY: &str = "SNAPSHOT_EVERY";
pub(crate) const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";

// --- Default values ---

pub(crate) const DEFAULT_SEED: u64 = 5489;
pub(crate) const DEFAULT_WIDTH: usize = 21;
pub(crate) const DEFAULT_HEIGHT: usize = 21;
pub(crate) const DEFAULT_SAMPLES_PER_PIXEL: u32 = 32;
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 12;
pub(crate) const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub(crate) const DEFAULT_L2: f64 = 0.01;
pub(crate) const DEFAULT_MOMENTUM: f64 = 0.0;
pub(crate) const DEFAULT_NUM_STEPS: usize = 200;
pub(crate) const DEFAULT_LOSS_LOG_EVERY: usize = 1;
pub(crate) const DEFAULT_SNAPSHOT_EVERY: usize = 10;
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "imgs";

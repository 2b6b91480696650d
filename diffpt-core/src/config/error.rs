//! Configuration errors.
//!
//! All errors produced by the config module (validation and env loading) use [`ConfigError`].
//! Callers can match on variants or use [`ConfigError::message`] for logging.

/// Errors produced when building or validating configuration.
///
/// # Variants
///
/// - **Validation**: A value is out of range (e.g. a zero image width or a negative L2 weight).
///   *When*: After building a `Config` and calling `validate()`.
///   *Recovery*: Fix the value (via env or code) so that `validate()` passes; the message names the rule.
///
/// - **EnvVar**: An environment variable could not be read (e.g. invalid Unicode).
///   *When*: When using env helpers to read a key.
///   *Recovery*: Ensure the variable contains valid Unicode, or unset it.
///
/// - **Parse**: An environment variable was set but could not be parsed (e.g. `DIFFPT_WIDTH=wide`).
///   *When*: When using `env_parsed` and the value is not valid for the target type.
///   *Recovery*: Set a valid value or unset the variable to use the default.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Configuration validation failed.
    #[error("config validation: {0}")]
    Validation(String),

    /// Failed to read an environment variable.
    #[error("env var {key}: {message}")]
    EnvVar {
        /// The full environment variable name that was read.
        key: String,
        /// Underlying cause (e.g. NotUnicode).
        message: String,
    },

    /// Environment variable was set but could not be parsed into the expected type.
    #[error("env var {key}={value:?}: {message}")]
    Parse {
        /// The full environment variable name.
        key: String,
        /// The raw value that failed to parse.
        value: String,
        /// Human-readable parse reason.
        message: String,
    },
}

impl ConfigError {
    /// Returns a short message suitable for logging or user display.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ConfigError::Validation(m) => m,
            ConfigError::EnvVar { message, .. } => message,
            ConfigError::Parse { message, .. } => message,
        }
    }
}

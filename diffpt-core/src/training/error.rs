//! Training errors.

use std::path::PathBuf;

use crate::autograd::AutogradError;
use crate::config::ConfigError;
use crate::image::ImageError;
use crate::integrator::RenderError;

/// Errors produced by the reflectance-recovery pipeline.
///
/// # Variants
///
/// - **Config**: The configuration failed validation.
///   *Recovery*: Fix the offending `DIFFPT_*` variable.
///
/// - **Render**: Rendering the target or a prediction failed.
///
/// - **Image**: Computing the loss or writing a snapshot failed.
///
/// - **Autograd**: The reflectance could not be marked differentiable.
///
/// - **OutputDir**: The snapshot directory could not be created.
///   *When*: `output_dir` points below a file or an unwritable location.
///   *Recovery*: Choose another `DIFFPT_OUTPUT_DIR`.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Autograd(#[from] AutogradError),

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

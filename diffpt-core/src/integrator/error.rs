//! Render errors.

use crate::autograd::AutogradError;
use crate::image::ImageError;

/// Errors produced while rendering.
///
/// # Variants
///
/// - **InvalidSettings**: The integrator or image settings cannot produce an image.
///   *When*: `render` with a zero width, height or sample count.
///   *Recovery*: Use positive values.
///
/// - **Autograd**: A numeric operation failed while tracing a path.
///   *When*: Degenerate geometry (a zero-length direction, a light on the shading point).
///   *Recovery*: None for this render; fix the scene or camera.
///
/// - **Image**: The rendered pixels could not be assembled into an image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render: invalid settings: {0}")]
    InvalidSettings(&'static str),

    #[error(transparent)]
    Autograd(#[from] AutogradError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

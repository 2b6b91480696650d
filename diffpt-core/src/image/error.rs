//! Image errors.

use crate::autograd::AutogradError;

/// Errors produced when building, comparing or writing images.
///
/// # Variants
///
/// - **Empty**: An image was built with a zero dimension.
///   *When*: [`Image::new`](super::Image::new) with `width == 0` or `height == 0`.
///   *Recovery*: Use positive dimensions.
///
/// - **PixelCount**: The pixel buffer does not hold `width * height` entries.
///   *When*: [`Image::new`](super::Image::new) with a buffer of the wrong length.
///   *Recovery*: Build the buffer row-major with one entry per pixel.
///
/// - **DimensionMismatch**: Two images of different sizes were compared.
///   *When*: [`Image::mse_loss`](super::Image::mse_loss) between a prediction and a target
///   rendered at another resolution.
///   *Recovery*: Render both images with the same width and height.
///
/// - **Autograd**: Building the loss graph failed.
///
/// - **Io**: Writing the PPM file failed.
///   *When*: The output directory is missing or not writable.
///   *Recovery*: Create the directory or choose another output path.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image: dimensions must be positive, got {width}x{height}")]
    Empty { width: usize, height: usize },

    #[error("image: expected {expected} pixels, got {found}")]
    PixelCount { expected: usize, found: usize },

    #[error("image: size mismatch, {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error(transparent)]
    Autograd(#[from] AutogradError),

    #[error("image: write failed: {0}")]
    Io(#[from] std::io::Error),
}

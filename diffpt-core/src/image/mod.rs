//! Rendered images of differentiable colours and the pixel-space loss between them.

mod error;
mod ppm;

pub use error::ImageError;
pub use ppm::tonemap;

use crate::autograd::{Value, Vec3};

/// Row-major grid of differentiable colours.
///
/// Each pixel is the root of the graph built while rendering it, so a loss computed over
/// the image backpropagates into every sample of every pixel.
#[derive(Clone, Debug)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
}

impl Image {
    /// # Errors
    ///
    /// - [`ImageError::Empty`] for a zero dimension.
    /// - [`ImageError::PixelCount`] if `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Vec3>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        let expected = width * height;
        if pixels.len() != expected {
            return Err(ImageError::PixelCount {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x)
    }

    /// Copy of the image with every pixel cut from its graph.
    #[must_use]
    pub fn detach(&self) -> Image {
        Image {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(Vec3::detach).collect(),
        }
    }

    /// Mean over pixels of the squared colour distance `|a - b|^2`.
    ///
    /// # Errors
    ///
    /// - [`ImageError::DimensionMismatch`] if the images differ in size.
    pub fn mse_loss(&self, other: &Image) -> Result<Value, ImageError> {
        if (self.width, self.height) != (other.width, other.height) {
            return Err(ImageError::DimensionMismatch {
                left: (self.width, self.height),
                right: (other.width, other.height),
            });
        }
        let terms = self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(a, b)| (a - b).norm_squared())
            .collect();
        Ok((&pairwise_sum(terms) / self.pixels.len() as f64)?)
    }
}

/// Sums by adding neighbours level by level, keeping the graph depth logarithmic in the
/// number of terms.
fn pairwise_sum(mut terms: Vec<Value>) -> Value {
    while terms.len() > 1 {
        terms = terms
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => a + b,
                _ => pair[0].clone(),
            })
            .collect();
    }
    terms.pop().unwrap_or_else(|| Value::constant(0.0))
}

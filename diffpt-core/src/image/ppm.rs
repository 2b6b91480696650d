//! ASCII PPM (`P3`) output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{Image, ImageError};

const GAMMA: f64 = 2.2;
const MAX_CHANNEL: f64 = 255.0;

/// Clamps to `[0, 1]` and applies the display gamma.
#[must_use]
pub fn tonemap(c: f64) -> f64 {
    c.clamp(0.0, 1.0).powf(1.0 / GAMMA)
}

fn to_byte(c: f64) -> u8 {
    // Truncates; tonemap keeps the product within [0, 255]. NaN maps to 0.
    (tonemap(c) * MAX_CHANNEL) as u8
}

impl Image {
    /// Writes the image as `P3`, one `r g b` line per pixel, rows top to bottom.
    ///
    /// # Errors
    ///
    /// - [`ImageError::Io`] if the writer fails.
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> Result<(), ImageError> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width(), self.height())?;
        writeln!(writer, "{}", MAX_CHANNEL as u32)?;
        for pixel in self.pixels() {
            let [r, g, b] = pixel.values().map(to_byte);
            writeln!(writer, "{r} {g} {b}")?;
        }
        Ok(())
    }

    /// Writes the image to `path`, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// - [`ImageError::Io`] if the file cannot be created or written.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut writer)?;
        writer.flush()?;
        log::debug!("wrote {}x{} image to {}", self.width(), self.height(), path.display());
        Ok(())
    }
}

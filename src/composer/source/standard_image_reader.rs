//! Source image reader backed by the `image` crate.
//!
//! Any format the `image` crate can read is accepted; the format is guessed
//! from the file contents first and the extension second. Every image is
//! converted to 8-bit RGBA before packing: 16-bit samples are scaled to
//! 8 bits with rounding and grayscale fills R, G and B alike.

use std::path::Path;

use image::ImageReader;
use tracing::debug;

use crate::composer::common::argb::{ArgbImage, DecodedImage};
use crate::composer::common::error::{ComposeError, Result};
use crate::composer::source::reader::ImageDecoder;

pub struct StandardImageReader;

impl ImageDecoder for StandardImageReader {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        debug!(path = %path.display(), "Decoding source image");

        let decode_error = |reason: String| ComposeError::Decode {
            path: path.to_path_buf(),
            reason,
        };

        let decoded = ImageReader::open(path)
            .map_err(|e| decode_error(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_error(e.to_string()))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))?;

        let rgba = decoded.to_rgba8();
        debug!("Decoded image: {}x{}", rgba.width(), rgba.height());

        Ok(ArgbImage::from_rgba8(&rgba))
    }
}

//! Pixel reader resolution.
//!
//! Each output channel is turned into a [`PixelReader`]: a pure function of
//! the pixel coordinate. Readers hold no reference to the configuration
//! they were built from, only the resolved value or image.

use std::sync::Arc;

use tracing::debug;

use crate::composer::channel::{InputSource, OutputChannel, OutputChannelConfig, SourceChannel};
use crate::composer::common::argb::DecodedImage;
use crate::composer::common::error::{ComposeError, Result};
use crate::composer::source::{ImageCache, ImageDecoder};

#[derive(Debug, Clone)]
pub enum PixelReader {
    Constant(u8),
    ImageChannel {
        image: Arc<DecodedImage>,
        channel: SourceChannel,
        invert: bool,
    },
}

impl PixelReader {
    #[inline]
    pub fn read(&self, x: u32, y: u32) -> u8 {
        match self {
            Self::Constant(value) => *value,
            Self::ImageChannel { image, channel, invert } => {
                let value = extract_channel(image.pixel(x, y), *channel);
                if *invert { !value } else { value }
            }
        }
    }
}

/// Extracts one byte from a packed `0xAARRGGBB` pixel.
#[inline]
pub fn extract_channel(argb: u32, channel: SourceChannel) -> u8 {
    let shift = match channel {
        SourceChannel::Red => 16,
        SourceChannel::Green => 8,
        SourceChannel::Blue => 0,
        SourceChannel::Alpha => 24,
    };
    ((argb >> shift) & 0xFF) as u8
}

/// Packs channel bytes given in R, G, B, A order into `0xAARRGGBB`.
#[inline]
pub fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_be_bytes([a, r, g, b])
}

/// Builds the reader for `output_channel` from its configuration, loading
/// the referenced image through `cache` when needed.
pub fn make_reader<D: ImageDecoder>(
    output_channel: OutputChannel,
    config: &OutputChannelConfig,
    cache: &mut ImageCache<'_, D>,
) -> Result<PixelReader> {
    match config.input_source {
        InputSource::Constant => {
            debug!(channel = %output_channel, value = config.constant_value, "Constant reader");
            Ok(PixelReader::Constant(config.constant_value))
        }
        InputSource::Image => {
            let filename = config
                .image_filename
                .as_deref()
                .ok_or(ComposeError::MissingFilename(output_channel))?;
            let image = cache.get_image(filename)?;
            debug!(
                channel = %output_channel,
                path = %filename.display(),
                source = %config.source_channel,
                invert = config.invert_image,
                "Image reader"
            );
            Ok(PixelReader::ImageChannel {
                image,
                channel: config.source_channel,
                invert: config.invert_image,
            })
        }
    }
}

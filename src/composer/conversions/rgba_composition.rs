use std::cell::Cell;
use std::io::Write;
use std::path::Path;

use image::ImageFormat;
use tracing::{debug, info, instrument, warn};

use crate::composer::{
    channel::{OutputChannel, OutputChannelConfig},
    common::argb::{ArgbImage, ComposedImage, Size},
    common::error::{ComposeError, Result},
    output::{ImageWriter, OutputConfig, SizeQuery, StandardImageWriter, resolve_size},
    pixel::{PixelReader, make_reader, pack_argb},
    source::{ImageCache, ImageDecoder, StandardImageReader},
};

/// Result of a composition pass.
#[derive(Debug)]
pub enum ComposeOutcome {
    Composed(ComposedImage),
    /// Every channel was constant and the size query was declined.
    Cancelled,
}

/// Result of composing and writing to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { size: Size, format: ImageFormat },
    Cancelled,
}

/// Clears the busy flag when the pass ends, however it ends.
struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Result<Self> {
        if flag.replace(true) {
            return Err(ComposeError::Busy);
        }
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct RgbaComposer<D: ImageDecoder, W: ImageWriter> {
    decoder: D,
    writer: W,
    config: OutputConfig,
    busy: Cell<bool>,
}

impl RgbaComposer<StandardImageReader, StandardImageWriter> {
    pub fn new(config: OutputConfig) -> Self {
        Self::with_custom(StandardImageReader, StandardImageWriter, config)
    }
}

impl<D: ImageDecoder, W: ImageWriter> RgbaComposer<D, W> {
    pub fn with_custom(decoder: D, writer: W, config: OutputConfig) -> Self {
        Self {
            decoder,
            writer,
            config,
            busy: Cell::new(false),
        }
    }

    fn validate_dimensions(&self, size: Size) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if size.is_empty() {
            return Err(ComposeError::InvalidDimensions(size.width, size.height));
        }

        if let Some(max) = self.config.max_dimension {
            if size.width > max || size.height > max {
                warn!("Image dimensions {} exceed maximum {}", size, max);
                return Err(ComposeError::InvalidDimensions(size.width, size.height));
            }
        }

        Ok(())
    }

    /// Runs one composition pass over the four channel configurations,
    /// given in R, G, B, A order.
    ///
    /// `initial_size` seeds `size_query`, which is consulted only when no
    /// channel reads from an image.
    #[instrument(skip_all)]
    pub fn compose(
        &self,
        channels: &[OutputChannelConfig; 4],
        initial_size: Size,
        size_query: &mut dyn SizeQuery,
    ) -> Result<ComposeOutcome> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        info!("Starting composition");

        let mut cache = ImageCache::new(&self.decoder);

        let readers = {
            let _span = tracing::info_span!("resolve_readers").entered();
            let [red, green, blue, alpha] = channels;
            [
                make_reader(OutputChannel::Red, red, &mut cache)?,
                make_reader(OutputChannel::Green, green, &mut cache)?,
                make_reader(OutputChannel::Blue, blue, &mut cache)?,
                make_reader(OutputChannel::Alpha, alpha, &mut cache)?,
            ]
        };

        let size = match cache.working_size() {
            Some(size) => size,
            None => {
                let _span = tracing::info_span!("resolve_size").entered();
                match resolve_size(size_query, initial_size)? {
                    Some(size) => size,
                    None => {
                        info!("Composition cancelled while choosing the output size");
                        return Ok(ComposeOutcome::Cancelled);
                    }
                }
            }
        };
        debug!(images = cache.len(), %size, "Readers resolved");

        self.validate_dimensions(size)?;

        let image = {
            let _span = tracing::info_span!("compose_pixels", width = size.width, height = size.height).entered();
            compose_pixels(size, &readers)
        };

        info!(width = size.width, height = size.height, "Composition complete");
        Ok(ComposeOutcome::Composed(image))
    }

    /// Encodes `image` as `format` into `output`.
    pub fn write(&self, image: &ComposedImage, output: &mut dyn Write, format: ImageFormat) -> Result<()> {
        let _span = tracing::info_span!("encode_image").entered();
        self.writer.write_image(image, output, format, &self.config)
    }

    /// Composes and writes the result to `output_path`.
    ///
    /// The format is the configured one, or else the one matching the
    /// path's extension, or else `fallback_format`. The image is encoded in
    /// memory first, so nothing is created when composing or encoding fails
    /// or the pass is cancelled. The file is written in place.
    #[instrument(skip_all)]
    pub fn save<P: AsRef<Path>>(
        &self,
        channels: &[OutputChannelConfig; 4],
        initial_size: Size,
        size_query: &mut dyn SizeQuery,
        output_path: P,
        fallback_format: ImageFormat,
    ) -> Result<SaveOutcome> {
        let output_path = output_path.as_ref();

        let image = match self.compose(channels, initial_size, size_query)? {
            ComposeOutcome::Composed(image) => image,
            ComposeOutcome::Cancelled => return Ok(SaveOutcome::Cancelled),
        };

        let format = crate::composer::output::resolve_output_format(
            self.config.format,
            output_path,
            fallback_format,
        );

        info!(
            output = %output_path.display(),
            format = ?format,
            "Saving composed image"
        );

        let mut encoded = Vec::new();
        self.write(&image, &mut encoded, format)
            .map_err(|e| e.at_destination(output_path))?;

        {
            let _span = tracing::info_span!("write_output_file", bytes = encoded.len()).entered();
            std::fs::write(output_path, &encoded)
                .map_err(|e| ComposeError::Io(e).at_destination(output_path))?;
        }

        Ok(SaveOutcome::Saved {
            size: image.size(),
            format,
        })
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: OutputConfig) {
        self.config = config;
    }
}

/// Evaluates the readers at every coordinate and packs the bytes into
/// ARGB pixels.
pub(crate) fn compose_pixels(size: Size, readers: &[PixelReader; 4]) -> ComposedImage {
    let [red, green, blue, alpha] = readers;
    ArgbImage::from_fn(size, |x, y| {
        pack_argb(red.read(x, y), green.read(x, y), blue.read(x, y), alpha.read(x, y))
    })
}

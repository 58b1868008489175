use std::io::{Cursor, Write};

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::composer::common::argb::ComposedImage;
use crate::composer::common::error::{ComposeError, Result};
use crate::composer::output::types::{OutputConfig, TiffCompression};
use crate::composer::output::writer::ImageWriter;

pub struct StandardImageWriter;

impl StandardImageWriter {
    fn encode_tiff(&self, image: &ComposedImage, buffer: &mut Vec<u8>, config: &OutputConfig) -> Result<()> {
        let compression = match config.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(Cursor::new(buffer))
            .map_err(|e| ComposeError::Encoding(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let rgba = image.to_rgba8();
        encoder.write_image::<tiff::encoder::colortype::RGBA8>(
            image.width(),
            image.height(),
            rgba.as_raw(),
        ).map_err(|e| ComposeError::Encoding(e.to_string()))?;

        Ok(())
    }

    fn encode_generic(&self, image: &ComposedImage, buffer: &mut Vec<u8>, format: ImageFormat) -> Result<()> {
        let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
        // JPEG has no alpha channel; the A output channel is dropped.
        let encodable = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(rgba.to_rgb8()),
            _ => rgba,
        };

        encodable
            .write_to(&mut Cursor::new(buffer), format)
            .map_err(|e| ComposeError::Encoding(e.to_string()))
    }
}

impl ImageWriter for StandardImageWriter {
    fn write_image(
        &self,
        image: &ComposedImage,
        output: &mut dyn Write,
        format: ImageFormat,
        config: &OutputConfig,
    ) -> Result<()> {
        debug!("Encoding {:?} image: {}x{}", format, image.width(), image.height());

        if !format.writing_enabled() {
            return Err(ComposeError::UnsupportedFormat(format!("{format:?} cannot be written")));
        }

        let mut buffer = Vec::new();
        match format {
            ImageFormat::Tiff => self.encode_tiff(image, &mut buffer, config)?,
            other => self.encode_generic(image, &mut buffer, other)?,
        }

        output.write_all(&buffer)?;

        debug!("Encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::common::argb::{ArgbImage, Size};
    use crate::composer::pixel::pack_argb;

    fn sample() -> ComposedImage {
        ArgbImage::from_pixels(
            Size::new(2, 2),
            vec![
                pack_argb(255, 0, 0, 255),
                pack_argb(0, 255, 0, 128),
                pack_argb(0, 0, 255, 0),
                pack_argb(10, 20, 30, 40),
            ],
        )
        .unwrap()
    }

    #[test]
    fn png_output_keeps_every_channel() {
        let mut out = Vec::new();
        StandardImageWriter
            .write_image(&sample(), &mut out, ImageFormat::Png, &OutputConfig::default())
            .unwrap();

        let decoded = image::load_from_memory_with_format(&out, ImageFormat::Png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 255, 0, 128]);
        assert_eq!(decoded.get_pixel(1, 1).0, [10, 20, 30, 40]);
    }

    #[test]
    fn tiff_output_honours_compression_settings() {
        for compression in [TiffCompression::None, TiffCompression::Lzw, TiffCompression::DeflateBest] {
            let config = OutputConfig::builder()
                .compression(compression)
                .predictor(Some(2))
                .build();
            let mut out = Vec::new();
            StandardImageWriter
                .write_image(&sample(), &mut out, ImageFormat::Tiff, &config)
                .unwrap();

            let mut decoder = tiff::decoder::Decoder::new(Cursor::new(&out)).unwrap();
            assert_eq!(decoder.dimensions().unwrap(), (2, 2));
            match decoder.read_image().unwrap() {
                tiff::decoder::DecodingResult::U8(data) => {
                    assert_eq!(&data[12..16], &[10, 20, 30, 40]);
                }
                _ => panic!("expected 8-bit samples"),
            }
        }
    }

    #[test]
    fn jpeg_output_drops_alpha_instead_of_failing() {
        let mut out = Vec::new();
        StandardImageWriter
            .write_image(&sample(), &mut out, ImageFormat::Jpeg, &OutputConfig::default())
            .unwrap();
        assert!(!out.is_empty());
    }
}

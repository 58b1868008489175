use std::io::Write;

use image::ImageFormat;

use crate::composer::common::{argb::ComposedImage, error::Result};
use crate::composer::output::types::OutputConfig;

pub trait ImageWriter {
    fn write_image(
        &self,
        image: &ComposedImage,
        output: &mut dyn Write,
        format: ImageFormat,
        config: &OutputConfig,
    ) -> Result<()>;
}

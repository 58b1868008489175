use std::path::Path;

use crate::composer::common::{argb::DecodedImage, error::Result};

pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage>;
}

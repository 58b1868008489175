//! Source image loading module
//!
//! Decoding of input images and the per-composition image cache.

mod reader;
mod standard_image_reader;
pub mod cache;

pub use reader::ImageDecoder;
pub use standard_image_reader::StandardImageReader;
pub use cache::ImageCache;

//! Output module
//!
//! Encoding of the composed image, output configuration, supported format
//! discovery and resolution of the output size when no input image
//! provides one.

mod writer;
mod standard_image_writer;
pub mod formats;
pub mod size;
pub mod types;

pub use writer::ImageWriter;
pub use standard_image_writer::StandardImageWriter;
pub use formats::{
    input_filename_filter, output_filename_filter, parse_output_format, resolve_output_format,
    supported_input_formats, supported_output_formats,
};
pub use size::{FixedSize, SizeQuery, TerminalSizePrompt, resolve_size};
pub use types::{OutputConfig, OutputConfigBuilder, TiffCompression};

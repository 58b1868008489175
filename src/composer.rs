//! Image composition module
//!
//! Builds one RGBA image from four independently configured output
//! channels: source image decoding and caching, per-channel pixel readers,
//! the composition pass itself and encoding of the result.

pub mod channel;
pub mod common;
pub mod conversions;
pub mod output;
pub mod pixel;
pub mod source;

pub use common::{
    ArgbImage,
    ComposeError,
    Result,
    Size,
};

pub use common::argb::{ComposedImage, DecodedImage};

pub use channel::{
    InputSource,
    OutputChannel,
    OutputChannelConfig,
    SourceChannel,
};

pub use source::{
    ImageCache,
    ImageDecoder,
    StandardImageReader,
};

pub use pixel::{
    PixelReader,
    make_reader,
};

pub use output::{
    FixedSize,
    ImageWriter,
    OutputConfig,
    OutputConfigBuilder,
    SizeQuery,
    StandardImageWriter,
    TerminalSizePrompt,
    TiffCompression,
};

pub use conversions::{
    ComposeOutcome,
    RgbaComposer,
    SaveOutcome,
};

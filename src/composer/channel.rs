//! Per-output-channel configuration

pub mod types;

pub use types::{InputSource, OutputChannel, OutputChannelConfig, SourceChannel};

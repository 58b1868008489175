//! Compose one RGBA image by choosing, per output channel, either a constant
//! byte or a channel extracted from a source image.

pub mod composer;
pub mod logger;
pub mod settings;

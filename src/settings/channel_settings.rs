//! Typed access to the stored channel configuration.
//!
//! Stored values are never trusted: every getter falls back to a default or
//! clamps into range when a value is missing, of the wrong type or out of
//! range.

use std::path::PathBuf;

use image::ImageFormat;
use serde_json::{Value, json};
use tracing::warn;

use crate::composer::channel::{InputSource, OutputChannel, OutputChannelConfig, SourceChannel};
use crate::composer::common::argb::Size;
use crate::composer::common::error::Result;
use crate::composer::output::formats::{format_name, parse_output_format};
use crate::settings::store::KeyValueStore;

struct Keys;

impl Keys {
    const OUTPUT_CHANNEL: &'static str = "outputChannel";
    const OUTPUT_FORMAT: &'static str = "outputFormat";
    const OUTPUT_SIZE: &'static str = "outputSize";

    const CONSTANT_VALUE: &'static str = "constantValue";
    const INPUT_CHANNEL: &'static str = "inputChannel";
    const INPUT_IMAGE_FILENAME: &'static str = "inputImageFilename";
    const INPUT_IMAGE_INVERT: &'static str = "inputImageInvert";
    const INPUT_SOURCE: &'static str = "inputSource";

    fn per_channel(channel: OutputChannel, key: &str) -> String {
        format!("{}_{}/{}", Self::OUTPUT_CHANNEL, channel.index(), key)
    }
}

const DEFAULT_OUTPUT_FORMAT: ImageFormat = ImageFormat::Png;

pub struct Settings<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }

    fn channel_value(&self, channel: OutputChannel, key: &str) -> Option<&Value> {
        self.store.get(&Keys::per_channel(channel, key))
    }

    fn set_channel_value(&mut self, channel: OutputChannel, key: &str, value: Value) {
        self.store.set(&Keys::per_channel(channel, key), value);
    }

    pub fn input_source(&self, channel: OutputChannel) -> InputSource {
        match self.channel_value(channel, Keys::INPUT_SOURCE) {
            None => InputSource::default(),
            Some(value) => value.as_str().and_then(InputSource::from_name).unwrap_or_else(|| {
                warn!(%channel, %value, "Ignoring invalid stored input source");
                InputSource::default()
            }),
        }
    }

    pub fn set_input_source(&mut self, channel: OutputChannel, source: InputSource) {
        self.set_channel_value(channel, Keys::INPUT_SOURCE, json!(source.name()));
    }

    pub fn input_constant(&self, channel: OutputChannel) -> u8 {
        let Some(value) = self.channel_value(channel, Keys::CONSTANT_VALUE) else {
            return 0;
        };

        let number = value
            .as_i64()
            .or_else(|| value.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
            .or_else(|| value.as_f64().map(|v| v.round() as i64));

        match number {
            Some(n) => n.clamp(0, i64::from(u8::MAX)) as u8,
            None => {
                warn!(%channel, %value, "Ignoring invalid stored constant value");
                0
            }
        }
    }

    pub fn set_input_constant(&mut self, channel: OutputChannel, constant: u8) {
        self.set_channel_value(channel, Keys::CONSTANT_VALUE, json!(constant));
    }

    pub fn input_image_filename(&self, channel: OutputChannel) -> Option<PathBuf> {
        self.channel_value(channel, Keys::INPUT_IMAGE_FILENAME)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    pub fn set_input_image_filename(&mut self, channel: OutputChannel, filename: Option<PathBuf>) {
        let value = match filename {
            Some(path) => json!(path.to_string_lossy()),
            None => Value::Null,
        };
        self.set_channel_value(channel, Keys::INPUT_IMAGE_FILENAME, value);
    }

    pub fn input_channel(&self, channel: OutputChannel) -> SourceChannel {
        self.channel_value(channel, Keys::INPUT_CHANNEL)
            .and_then(Value::as_u64)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(SourceChannel::from_index)
            .unwrap_or_default()
    }

    pub fn set_input_channel(&mut self, channel: OutputChannel, source: SourceChannel) {
        self.set_channel_value(channel, Keys::INPUT_CHANNEL, json!(source.index()));
    }

    pub fn input_image_invert(&self, channel: OutputChannel) -> bool {
        self.channel_value(channel, Keys::INPUT_IMAGE_INVERT)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_input_image_invert(&mut self, channel: OutputChannel, invert: bool) {
        self.set_channel_value(channel, Keys::INPUT_IMAGE_INVERT, json!(invert));
    }

    pub fn output_size(&self) -> Size {
        self.store
            .get(Keys::OUTPUT_SIZE)
            .and_then(|v| serde_json::from_value::<Size>(v.clone()).ok())
            .filter(|size| !size.is_empty())
            .unwrap_or_default()
    }

    pub fn set_output_size(&mut self, size: Size) {
        self.store.set(Keys::OUTPUT_SIZE, json!(size));
    }

    pub fn output_format(&self) -> ImageFormat {
        self.store
            .get(Keys::OUTPUT_FORMAT)
            .and_then(Value::as_str)
            .and_then(|name| parse_output_format(name).ok())
            .unwrap_or(DEFAULT_OUTPUT_FORMAT)
    }

    pub fn set_output_format(&mut self, format: ImageFormat) {
        self.store.set(Keys::OUTPUT_FORMAT, json!(format_name(format)));
    }

    /// Snapshot of one channel's configuration.
    pub fn channel_config(&self, channel: OutputChannel) -> OutputChannelConfig {
        OutputChannelConfig {
            input_source: self.input_source(channel),
            constant_value: self.input_constant(channel),
            image_filename: self.input_image_filename(channel),
            source_channel: self.input_channel(channel),
            invert_image: self.input_image_invert(channel),
        }
    }

    pub fn set_channel_config(&mut self, channel: OutputChannel, config: &OutputChannelConfig) {
        self.set_input_source(channel, config.input_source);
        self.set_input_constant(channel, config.constant_value);
        self.set_input_image_filename(channel, config.image_filename.clone());
        self.set_input_channel(channel, config.source_channel);
        self.set_input_image_invert(channel, config.invert_image);
    }

    /// Snapshot of all four channels in R, G, B, A order.
    pub fn channel_configs(&self) -> [OutputChannelConfig; 4] {
        OutputChannel::ALL.map(|channel| self.channel_config(channel))
    }
}

//! Channel configuration types

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One of the four components of the composed image, in R, G, B, A order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputChannel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl OutputChannel {
    pub const ALL: [OutputChannel; 4] = [Self::Red, Self::Green, Self::Blue, Self::Alpha];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn short_name(self) -> &'static str {
        ["R", "G", "B", "A"][self.index()]
    }
}

impl fmt::Display for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for OutputChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" | "0" => Ok(Self::Red),
            "g" | "green" | "1" => Ok(Self::Green),
            "b" | "blue" | "2" => Ok(Self::Blue),
            "a" | "alpha" | "3" => Ok(Self::Alpha),
            _ => Err(format!("unknown output channel `{s}` (expected r, g, b or a)")),
        }
    }
}

/// Which component of a source image an output channel extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceChannel {
    #[default]
    Red,
    Green,
    Blue,
    Alpha,
}

impl SourceChannel {
    pub const ALL: [SourceChannel; 4] = [Self::Red, Self::Green, Self::Blue, Self::Alpha];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        ["red", "green", "blue", "alpha"][self.index()]
    }
}

impl fmt::Display for SourceChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Self::Red),
            "g" | "green" => Ok(Self::Green),
            "b" | "blue" => Ok(Self::Blue),
            "a" | "alpha" => Ok(Self::Alpha),
            _ => Err(format!("unknown source channel `{s}` (expected red, green, blue or alpha)")),
        }
    }
}

/// Where an output channel takes its bytes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSource {
    #[default]
    Constant,
    Image,
}

impl InputSource {
    pub fn name(self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::Image => "Image",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Constant" => Some(Self::Constant),
            "Image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Settings for a single output channel.
///
/// `constant_value` is used when `input_source` is `Constant`; the image
/// fields are used when it is `Image`. Both sets are kept so switching the
/// source back and forth does not lose the other half.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputChannelConfig {
    pub input_source: InputSource,
    pub constant_value: u8,
    pub image_filename: Option<PathBuf>,
    pub source_channel: SourceChannel,
    pub invert_image: bool,
}

impl OutputChannelConfig {
    pub fn constant(value: u8) -> Self {
        Self {
            input_source: InputSource::Constant,
            constant_value: value,
            ..Self::default()
        }
    }

    pub fn image(filename: impl Into<PathBuf>, source_channel: SourceChannel) -> Self {
        Self {
            input_source: InputSource::Image,
            image_filename: Some(filename.into()),
            source_channel,
            ..Self::default()
        }
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert_image = invert;
        self
    }
}

impl fmt::Display for OutputChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.input_source {
            InputSource::Constant => write!(f, "constant {}", self.constant_value),
            InputSource::Image => {
                let filename = self
                    .image_filename
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<choose filename>".to_string());
                write!(f, "image {filename} [{}]", self.source_channel)?;
                if self.invert_image {
                    f.write_str(" inverted")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_channels_are_ordered_rgba() {
        let names: Vec<_> = OutputChannel::ALL.iter().map(|c| c.short_name()).collect();
        assert_eq!(names, ["R", "G", "B", "A"]);
        assert_eq!(OutputChannel::from_index(3), Some(OutputChannel::Alpha));
        assert_eq!(OutputChannel::from_index(4), None);
    }

    #[test]
    fn channels_parse_from_short_and_long_names() {
        assert_eq!("g".parse::<OutputChannel>().unwrap(), OutputChannel::Green);
        assert_eq!("Alpha".parse::<SourceChannel>().unwrap(), SourceChannel::Alpha);
        assert!("x".parse::<OutputChannel>().is_err());
    }

    #[test]
    fn default_config_is_constant_zero() {
        let config = OutputChannelConfig::default();
        assert_eq!(config.input_source, InputSource::Constant);
        assert_eq!(config.constant_value, 0);
        assert_eq!(config.source_channel, SourceChannel::Red);
        assert!(!config.invert_image);
    }

    #[test]
    fn display_describes_the_active_source() {
        assert_eq!(OutputChannelConfig::constant(7).to_string(), "constant 7");
        let image = OutputChannelConfig::image("a.png", SourceChannel::Blue).inverted(true);
        assert_eq!(image.to_string(), "image a.png [blue] inverted");
    }
}

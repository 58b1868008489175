//! Output configuration types

use image::ImageFormat;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

impl std::str::FromStr for TiffCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "lzw" => Ok(Self::Lzw),
            "deflate-fast" => Ok(Self::DeflateFast),
            "deflate" | "deflate-balanced" => Ok(Self::DeflateBalanced),
            "deflate-best" => Ok(Self::DeflateBest),
            _ => Err(format!(
                "unknown TIFF compression `{s}` (expected none, lzw, deflate-fast, deflate, deflate-best)"
            )),
        }
    }
}

/// Configuration for composing and writing the output image
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format; when `None` it is chosen from the destination path
    pub format: Option<ImageFormat>,
    /// Compression used when the output format is TIFF
    pub compression: TiffCompression,
    /// TIFF predictor (2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// Whether to reject empty or oversized output dimensions
    pub validate_dimensions: bool,
    /// Largest accepted width or height when validating
    pub max_dimension: Option<u32>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            compression: TiffCompression::Lzw,
            predictor: None,
            validate_dimensions: true,
            max_dimension: Some(65535),
        }
    }
}

impl OutputConfig {
    pub fn builder() -> OutputConfigBuilder {
        OutputConfigBuilder::default()
    }
}

/// Builder for OutputConfig
#[derive(Default)]
pub struct OutputConfigBuilder {
    format: Option<Option<ImageFormat>>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<u32>>,
}

impl OutputConfigBuilder {
    pub fn format(mut self, format: Option<ImageFormat>) -> Self {
        self.format = Some(format);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<u32>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> OutputConfig {
        let default = OutputConfig::default();
        OutputConfig {
            format: self.format.unwrap_or(default.format),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}

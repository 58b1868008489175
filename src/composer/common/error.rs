use std::path::PathBuf;

use thiserror::Error;

use crate::composer::channel::OutputChannel;
use crate::composer::common::argb::Size;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("failed to read image from {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error(
        "image {} is {actual} but the other input images are {expected}; all input images must be the same size",
        path.display()
    )]
    SizeMismatch {
        path: PathBuf,
        expected: Size,
        actual: Size,
    },

    #[error("failed to save image to {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    /// Encoder failure with no destination file attached yet.
    #[error("failed to encode image: {0}")]
    Encoding(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(u32, u32),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("output channel {0} reads from an image but no filename is set")]
    MissingFilename(OutputChannel),

    #[error("settings store error: {0}")]
    Settings(String),

    #[error("a composition is already running")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ComposeError {
    /// Attach the destination filename to an encoder or IO failure.
    pub fn at_destination(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Encoding(reason) => Self::Encode { path: path.into(), reason },
            Self::Io(err) => Self::Encode { path: path.into(), reason: err.to_string() },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_the_file() {
        let err = ComposeError::Decode {
            path: PathBuf::from("in/red.png"),
            reason: "truncated".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("in/red.png"));
        assert!(msg.contains("truncated"));
    }

    #[test]
    fn size_mismatch_reports_both_sizes() {
        let err = ComposeError::SizeMismatch {
            path: PathBuf::from("b.png"),
            expected: Size::new(2, 2),
            actual: Size::new(3, 1),
        };
        let msg = err.to_string();
        assert!(msg.contains("2x2"));
        assert!(msg.contains("3x1"));
        assert!(msg.contains("b.png"));
    }

    #[test]
    fn at_destination_wraps_encoder_and_io_failures() {
        let err = ComposeError::Encoding("no encoder".to_string()).at_destination("out.png");
        assert!(matches!(err, ComposeError::Encode { ref path, .. } if path == &PathBuf::from("out.png")));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ComposeError::Io(io).at_destination("out.png");
        assert!(matches!(err, ComposeError::Encode { ref reason, .. } if reason.contains("denied")));

        let err = ComposeError::Busy.at_destination("out.png");
        assert!(matches!(err, ComposeError::Busy));
    }
}

//! Common utilities module
//!
//! Shared error type and the packed pixel buffer used by every stage.

pub mod argb;
pub mod error;

pub use argb::{ArgbImage, Size};
pub use error::{ComposeError, Result};

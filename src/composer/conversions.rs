//! Composition module
//!
//! Orchestration of a composition pass: readers, size, pixel loop, encode.

mod rgba_composition;


pub use rgba_composition::{ComposeOutcome, RgbaComposer, SaveOutcome};

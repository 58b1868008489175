//! Persistent settings module
//!
//! A small key-value store and the typed channel configuration accessors
//! built on top of it.

mod store;
mod channel_settings;
mod remembered_size;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use channel_settings::Settings;
pub use remembered_size::RememberedSize;

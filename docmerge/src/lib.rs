//! DocMerge - ordered batch merging of numbered documents
//!
//! This library discovers numbered documents in an input folder, orders them
//! by the numeric suffix of their filenames, and drives an external document
//! engine to concatenate them into a single document that is exported in a
//! fixed-layout (PDF) format alongside a native-format backup.

pub mod config;
pub mod engine;
pub mod filename;
pub mod merge;

/// Library version, taken from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

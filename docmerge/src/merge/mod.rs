//! Merge orchestration
//!
//! Coordinates one merge run: scan the input folder, order eligible files by
//! their filename index, open each through the document engine, append their
//! content to a single accumulator document, export it as fixed-layout PDF,
//! and save a native-format backup. Every engine handle acquired during the
//! run is released through the [`HandleRegistry`] regardless of failures.

mod orchestrator;
mod registry;
mod types;

pub use orchestrator::MergeOrchestrator;
pub use registry::HandleRegistry;
pub use types::{MergeError, MergeReport, SkipStage, SkippedFile};

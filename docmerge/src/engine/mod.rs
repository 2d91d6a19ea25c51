//! Document engine abstraction
//!
//! This module provides the trait and implementations for the external
//! document-editing engine the merge pipeline drives: open existing
//! documents, create the accumulator, append content, export a fixed-layout
//! (PDF) rendition, and save the native format.
//!
//! The engine is an opaque external collaborator. The orchestrator only ever
//! sees [`DocumentHandle`] values and must release each one it acquires;
//! implementations keep release idempotent so best-effort teardown is safe.
//!
//! Two implementations are provided:
//!
//! - [`PandocEngine`] drives the external `pandoc` converter through a
//!   temporary staging directory.
//! - [`MemoryEngine`] is an in-memory engine over plain text, used for tests
//!   and plain-text pipelines without an external converter.

mod memory;
mod pandoc;
mod types;

pub use memory::MemoryEngine;
pub use pandoc::PandocEngine;
pub use types::{DocumentEngine, DocumentHandle, EngineError};

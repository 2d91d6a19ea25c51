//! Core engine trait and error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Opaque reference to a document open inside the engine.
///
/// Handles are issued by the engine session and owned by the caller until
/// released. Source handles are read-only; the single accumulator handle is
/// the only one ever mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(u64);

impl DocumentHandle {
    /// Create a handle from an engine-issued identifier.
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw engine-issued identifier.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Errors raised by a document engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to open an existing document.
    #[error("failed to open document {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// A handle does not refer to an open document.
    #[error("unknown document handle {0}")]
    InvalidHandle(u64),

    /// Appending one document's content to another failed.
    #[error("append failed: {0}")]
    Append(String),

    /// Fixed-layout export failed.
    #[error("fixed-layout export to {path} failed: {reason}")]
    Export { path: PathBuf, reason: String },

    /// Saving the native format failed.
    #[error("native save to {path} failed: {reason}")]
    Save { path: PathBuf, reason: String },

    /// The operation is not valid for this document.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// The external converter process failed.
    #[error("engine command failed: {0}")]
    Command(String),

    /// I/O error talking to the engine or filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for the external document-editing engine.
///
/// One implementation instance is one engine session. The session owns every
/// handle it issues and must outlive them; [`DocumentEngine::close`] is the
/// explicit session teardown. All operations are synchronous and blocking.
pub trait DocumentEngine {
    /// Open an existing document read-only.
    fn open_document(&mut self, path: &Path) -> Result<DocumentHandle, EngineError>;

    /// Create a new, empty, writable document (the accumulator).
    fn new_document(&mut self) -> Result<DocumentHandle, EngineError>;

    /// Replace the document's content with `text`.
    ///
    /// Used once to seed the freshly created accumulator with a blank
    /// placeholder character, so append primitives always have a non-empty
    /// target. Only valid on writable documents.
    fn set_text(&mut self, doc: DocumentHandle, text: &str) -> Result<(), EngineError>;

    /// Append the full content of `source` to the end of `target`.
    fn append_content(
        &mut self,
        target: DocumentHandle,
        source: DocumentHandle,
    ) -> Result<(), EngineError>;

    /// Export the document as a fixed-layout (PDF) file, overwriting `path`.
    fn export_fixed_format(
        &mut self,
        doc: DocumentHandle,
        path: &Path,
    ) -> Result<(), EngineError>;

    /// Save the document in its native editable format, overwriting `path`.
    fn save_native(&mut self, doc: DocumentHandle, path: &Path) -> Result<(), EngineError>;

    /// Release a handle. Idempotent: releasing an already-released handle
    /// succeeds without effect.
    fn release(&mut self, handle: DocumentHandle) -> Result<(), EngineError>;

    /// Tear down the session, releasing any engine-side resources that are
    /// still held. Handles issued by this session are invalid afterwards.
    fn close(&mut self) -> Result<(), EngineError>;
}

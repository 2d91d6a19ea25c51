//! In-memory document engine over plain text.
//!
//! Serves as the test double for the merge pipeline and as a real backend
//! for plain-text inputs. Documents are UTF-8 buffers; "fixed-layout export"
//! and "native save" both write the buffer to disk, so content comparisons
//! in tests see exactly what was merged.
//!
//! The engine counts acquired and released handles so tests can assert the
//! release-exactly-once property, and supports injecting open/append
//! failures for specific source paths.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::{DocumentEngine, DocumentHandle, EngineError};

/// A document held by the in-memory engine.
#[derive(Debug, Clone)]
struct Document {
    text: String,
    writable: bool,
    /// Path the document was opened from, if any. Used for fault injection.
    origin: Option<PathBuf>,
}

/// In-memory document engine.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    documents: HashMap<DocumentHandle, Document>,
    next_id: u64,
    acquired: usize,
    released: usize,
    closed: bool,
    fail_open: HashSet<PathBuf>,
    fail_append: HashSet<PathBuf>,
    export_fails: bool,
    save_fails: bool,
}

impl MemoryEngine {
    /// Create a new in-memory engine session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `open_document` fail for the given path.
    pub fn fail_open_for(&mut self, path: impl Into<PathBuf>) {
        self.fail_open.insert(path.into());
    }

    /// Make `append_content` fail for documents opened from the given path.
    pub fn fail_append_for(&mut self, path: impl Into<PathBuf>) {
        self.fail_append.insert(path.into());
    }

    /// Make every `export_fixed_format` call fail.
    pub fn fail_export(&mut self) {
        self.export_fails = true;
    }

    /// Make every `save_native` call fail.
    pub fn fail_save(&mut self) {
        self.save_fails = true;
    }

    /// Number of handles this session has issued.
    pub fn acquired_handles(&self) -> usize {
        self.acquired
    }

    /// Number of handles that have been released.
    pub fn released_handles(&self) -> usize {
        self.released
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Current text of an open document, for assertions.
    pub fn document_text(&self, handle: DocumentHandle) -> Option<&str> {
        self.documents.get(&handle).map(|d| d.text.as_str())
    }

    fn issue(&mut self, document: Document) -> DocumentHandle {
        self.next_id += 1;
        let handle = DocumentHandle::from_raw(self.next_id);
        self.documents.insert(handle, document);
        self.acquired += 1;
        handle
    }

    fn get(&self, handle: DocumentHandle) -> Result<&Document, EngineError> {
        self.documents
            .get(&handle)
            .ok_or(EngineError::InvalidHandle(handle.raw()))
    }
}

impl DocumentEngine for MemoryEngine {
    fn open_document(&mut self, path: &Path) -> Result<DocumentHandle, EngineError> {
        if self.fail_open.contains(path) {
            return Err(EngineError::Open {
                path: path.to_path_buf(),
                reason: "injected open failure".to_string(),
            });
        }

        let text = fs::read_to_string(path).map_err(|e| EngineError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(self.issue(Document {
            text,
            writable: false,
            origin: Some(path.to_path_buf()),
        }))
    }

    fn new_document(&mut self) -> Result<DocumentHandle, EngineError> {
        Ok(self.issue(Document {
            text: String::new(),
            writable: true,
            origin: None,
        }))
    }

    fn set_text(&mut self, doc: DocumentHandle, text: &str) -> Result<(), EngineError> {
        let document = self
            .documents
            .get_mut(&doc)
            .ok_or(EngineError::InvalidHandle(doc.raw()))?;
        if !document.writable {
            return Err(EngineError::Unsupported(
                "source documents are read-only".to_string(),
            ));
        }
        document.text = text.to_string();
        Ok(())
    }

    fn append_content(
        &mut self,
        target: DocumentHandle,
        source: DocumentHandle,
    ) -> Result<(), EngineError> {
        let source_doc = self.get(source)?;
        if let Some(origin) = &source_doc.origin {
            if self.fail_append.contains(origin) {
                return Err(EngineError::Append(format!(
                    "injected append failure for {}",
                    origin.display()
                )));
            }
        }
        let text = source_doc.text.clone();

        let target_doc = self
            .documents
            .get_mut(&target)
            .ok_or(EngineError::InvalidHandle(target.raw()))?;
        if !target_doc.writable {
            return Err(EngineError::Unsupported(
                "append target must be the accumulator".to_string(),
            ));
        }
        target_doc.text.push_str(&text);
        Ok(())
    }

    fn export_fixed_format(
        &mut self,
        doc: DocumentHandle,
        path: &Path,
    ) -> Result<(), EngineError> {
        if self.export_fails {
            return Err(EngineError::Export {
                path: path.to_path_buf(),
                reason: "injected export failure".to_string(),
            });
        }
        let document = self.get(doc)?;
        fs::write(path, document.text.as_bytes()).map_err(|e| EngineError::Export {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn save_native(&mut self, doc: DocumentHandle, path: &Path) -> Result<(), EngineError> {
        if self.save_fails {
            return Err(EngineError::Save {
                path: path.to_path_buf(),
                reason: "injected save failure".to_string(),
            });
        }
        let document = self.get(doc)?;
        fs::write(path, document.text.as_bytes()).map_err(|e| EngineError::Save {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn release(&mut self, handle: DocumentHandle) -> Result<(), EngineError> {
        if self.documents.remove(&handle).is_some() {
            self.released += 1;
            debug!(handle = handle.raw(), "released document handle");
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), EngineError> {
        // Any handles the caller leaked are reclaimed with the session.
        let leaked = self.documents.len();
        if leaked > 0 {
            debug!(leaked, "closing session with unreleased handles");
            self.released += leaked;
            self.documents.clear();
        }
        self.closed = true;
        Ok(())
    }
}

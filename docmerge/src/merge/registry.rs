//! Typed ownership registry for engine handles.
//!
//! Every handle the orchestrator acquires is tracked here and released in a
//! single teardown pass. A release failure is logged and never stops the
//! remaining releases; the engine keeps release idempotent, so the teardown
//! is best-effort rather than transactional.

use tracing::warn;

use crate::engine::{DocumentEngine, DocumentHandle};

/// Tracks handles acquired during a merge run for unconditional release.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    handles: Vec<DocumentHandle>,
}

impl HandleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a handle for release at teardown.
    pub fn track(&mut self, handle: DocumentHandle) -> DocumentHandle {
        self.handles.push(handle);
        handle
    }

    /// Number of handles currently tracked.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Release every tracked handle, once each, logging failures.
    pub fn release_all<E: DocumentEngine>(&mut self, engine: &mut E) {
        for handle in self.handles.drain(..) {
            if let Err(e) = engine.release(handle) {
                warn!(handle = handle.raw(), error = %e, "failed to release document handle");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;

    #[test]
    fn test_release_all_drains_registry() {
        let mut engine = MemoryEngine::new();
        let mut registry = HandleRegistry::new();

        registry.track(engine.new_document().unwrap());
        registry.track(engine.new_document().unwrap());
        assert_eq!(registry.len(), 2);

        registry.release_all(&mut engine);

        assert!(registry.is_empty());
        assert_eq!(engine.released_handles(), 2);
    }

    #[test]
    fn test_release_all_on_empty_registry() {
        let mut engine = MemoryEngine::new();
        let mut registry = HandleRegistry::new();
        registry.release_all(&mut engine);
        assert_eq!(engine.released_handles(), 0);
    }
}

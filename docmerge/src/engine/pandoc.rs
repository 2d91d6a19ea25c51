//! Document engine backed by the external `pandoc` converter.
//!
//! Each session owns a temporary staging directory. Source documents are
//! registered by path and never modified; the accumulator lives as a staged
//! native file that is rebuilt on every append:
//!
//! ```text
//! pandoc <accumulator> <source> -o <staged output>   # append
//! pandoc <accumulator> -o <output.pdf>               # fixed-layout export
//! ```
//!
//! Output formats are inferred by pandoc from file extensions. The converter
//! binary name is configurable for hosts where `pandoc` is not on PATH.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;
use tracing::debug;

use super::types::{DocumentEngine, DocumentHandle, EngineError};

const DEFAULT_COMMAND: &str = "pandoc";

/// A document tracked by the pandoc session.
#[derive(Debug)]
enum StagedDocument {
    /// Existing input file, read-only.
    Source { path: PathBuf },
    /// The staged accumulator. `seeded` flips once `set_text` has produced
    /// the initial non-empty file.
    Accumulator { path: PathBuf, seeded: bool },
}

/// Document engine driving an external pandoc process.
pub struct PandocEngine {
    command: String,
    /// Staging area for accumulator files; `None` once the session is closed.
    staging: Option<TempDir>,
    documents: HashMap<DocumentHandle, StagedDocument>,
    next_id: u64,
    next_op: u64,
}

impl PandocEngine {
    /// Open a new session with the default `pandoc` binary.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_command(DEFAULT_COMMAND)
    }

    /// Open a new session with a custom converter command.
    pub fn with_command(command: impl Into<String>) -> Result<Self, EngineError> {
        Ok(Self {
            command: command.into(),
            staging: Some(TempDir::new()?),
            documents: HashMap::new(),
            next_id: 0,
            next_op: 0,
        })
    }

    fn staging_dir(&self) -> Result<&Path, EngineError> {
        self.staging
            .as_ref()
            .map(TempDir::path)
            .ok_or_else(|| EngineError::Unsupported("engine session is closed".to_string()))
    }

    fn issue(&mut self, document: StagedDocument) -> DocumentHandle {
        self.next_id += 1;
        let handle = DocumentHandle::from_raw(self.next_id);
        self.documents.insert(handle, document);
        handle
    }

    fn scratch_path(&mut self, prefix: &str) -> Result<PathBuf, EngineError> {
        self.next_op += 1;
        let name = format!("{}-{}.docx", prefix, self.next_op);
        Ok(self.staging_dir()?.join(name))
    }

    /// Path holding the readable content of a document.
    fn content_path(&self, handle: DocumentHandle) -> Result<&Path, EngineError> {
        match self.documents.get(&handle) {
            Some(StagedDocument::Source { path }) => Ok(path),
            Some(StagedDocument::Accumulator { path, seeded: true }) => Ok(path),
            Some(StagedDocument::Accumulator { seeded: false, .. }) => Err(
                EngineError::Unsupported("accumulator has no content yet".to_string()),
            ),
            None => Err(EngineError::InvalidHandle(handle.raw())),
        }
    }

    fn run(&self, args: &[&Path], output: &Path) -> Result<(), EngineError> {
        let result = Command::new(&self.command)
            .args(args)
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|e| {
                EngineError::Command(format!("failed to run {}: {}", self.command, e))
            })?;

        if !result.status.success() {
            return Err(EngineError::Command(format!(
                "{} exited with {}: {}",
                self.command,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        Ok(())
    }

    fn run_with_stdin(&self, text: &str, output: &Path) -> Result<(), EngineError> {
        let mut child = Command::new(&self.command)
            .arg("-f")
            .arg("markdown")
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| {
                EngineError::Command(format!("failed to run {}: {}", self.command, e))
            })?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(text.as_bytes())?;
        }

        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(EngineError::Command(format!(
                "{} exited with {}: {}",
                self.command,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl DocumentEngine for PandocEngine {
    fn open_document(&mut self, path: &Path) -> Result<DocumentHandle, EngineError> {
        self.staging_dir()?;
        if !path.is_file() {
            return Err(EngineError::Open {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }

        let handle = self.issue(StagedDocument::Source {
            path: path.to_path_buf(),
        });
        debug!(file = %path.display(), handle = handle.raw(), "opened source document");
        Ok(handle)
    }

    fn new_document(&mut self) -> Result<DocumentHandle, EngineError> {
        let path = self.scratch_path("accumulator")?;
        let handle = self.issue(StagedDocument::Accumulator {
            path,
            seeded: false,
        });
        debug!(handle = handle.raw(), "created accumulator document");
        Ok(handle)
    }

    fn set_text(&mut self, doc: DocumentHandle, text: &str) -> Result<(), EngineError> {
        let path = match self.documents.get(&doc) {
            Some(StagedDocument::Accumulator { path, .. }) => path.clone(),
            Some(StagedDocument::Source { .. }) => {
                return Err(EngineError::Unsupported(
                    "source documents are read-only".to_string(),
                ))
            }
            None => return Err(EngineError::InvalidHandle(doc.raw())),
        };

        // Pandoc refuses fully empty input, so the caller's placeholder text
        // becomes the initial document body.
        let body = if text.trim().is_empty() { "\u{00a0}" } else { text };
        self.run_with_stdin(body, &path)?;

        if let Some(StagedDocument::Accumulator { seeded, .. }) = self.documents.get_mut(&doc) {
            *seeded = true;
        }
        Ok(())
    }

    fn append_content(
        &mut self,
        target: DocumentHandle,
        source: DocumentHandle,
    ) -> Result<(), EngineError> {
        let target_path = match self.documents.get(&target) {
            Some(StagedDocument::Accumulator { path, seeded: true }) => path.clone(),
            Some(StagedDocument::Accumulator { seeded: false, .. }) => {
                return Err(EngineError::Unsupported(
                    "accumulator must be seeded before appending".to_string(),
                ))
            }
            Some(StagedDocument::Source { .. }) => {
                return Err(EngineError::Unsupported(
                    "append target must be the accumulator".to_string(),
                ))
            }
            None => return Err(EngineError::InvalidHandle(target.raw())),
        };
        if target == source {
            return Err(EngineError::Append(
                "cannot append a document to itself".to_string(),
            ));
        }
        let source_path = self.content_path(source)?.to_path_buf();

        let merged = self.scratch_path("append")?;
        self.run(&[target_path.as_path(), source_path.as_path()], &merged)
            .map_err(|e| EngineError::Append(e.to_string()))?;
        fs::rename(&merged, &target_path)?;

        debug!(
            target = target.raw(),
            source = source.raw(),
            "appended document content"
        );
        Ok(())
    }

    fn export_fixed_format(
        &mut self,
        doc: DocumentHandle,
        path: &Path,
    ) -> Result<(), EngineError> {
        let input = self.content_path(doc)?.to_path_buf();
        self.run(&[input.as_path()], path)
            .map_err(|e| EngineError::Export {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn save_native(&mut self, doc: DocumentHandle, path: &Path) -> Result<(), EngineError> {
        let input = self.content_path(doc)?.to_path_buf();
        fs::copy(&input, path).map_err(|e| EngineError::Save {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn release(&mut self, handle: DocumentHandle) -> Result<(), EngineError> {
        if let Some(StagedDocument::Accumulator { path, seeded: true }) =
            self.documents.remove(&handle)
        {
            // Staged accumulator files are reclaimed eagerly rather than
            // waiting for the staging directory to drop.
            if let Err(e) = fs::remove_file(&path) {
                debug!(file = %path.display(), error = %e, "failed to remove staged file");
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), EngineError> {
        self.documents.clear();
        if let Some(staging) = self.staging.take() {
            staging.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // These tests cover session bookkeeping only; conversions that would
    // spawn the external pandoc binary are exercised by hand.

    #[test]
    fn test_open_missing_file_fails() {
        let mut engine = PandocEngine::new().unwrap();
        let result = engine.open_document(Path::new("/nonexistent/intro1.docx"));
        assert!(matches!(result, Err(EngineError::Open { .. })));
    }

    #[test]
    fn test_open_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("intro1.docx");
        fs::write(&path, b"stub").unwrap();

        let mut engine = PandocEngine::new().unwrap();
        assert!(engine.open_document(&path).is_ok());
    }

    #[test]
    fn test_set_text_on_source_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("intro1.docx");
        fs::write(&path, b"stub").unwrap();

        let mut engine = PandocEngine::new().unwrap();
        let handle = engine.open_document(&path).unwrap();

        let result = engine.set_text(handle, " ");
        assert!(matches!(result, Err(EngineError::Unsupported(_))));
    }

    #[test]
    fn test_append_before_seed_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("intro1.docx");
        fs::write(&path, b"stub").unwrap();

        let mut engine = PandocEngine::new().unwrap();
        let source = engine.open_document(&path).unwrap();
        let acc = engine.new_document().unwrap();

        let result = engine.append_content(acc, source);
        assert!(matches!(result, Err(EngineError::Unsupported(_))));
    }

    #[test]
    fn test_export_unseeded_accumulator_rejected() {
        let temp = TempDir::new().unwrap();
        let mut engine = PandocEngine::new().unwrap();
        let acc = engine.new_document().unwrap();

        let result = engine.export_fixed_format(acc, &temp.path().join("out.pdf"));
        assert!(matches!(result, Err(EngineError::Unsupported(_))));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut engine = PandocEngine::new().unwrap();
        let acc = engine.new_document().unwrap();

        engine.release(acc).unwrap();
        engine.release(acc).unwrap();
    }

    #[test]
    fn test_closed_session_rejects_new_documents() {
        let mut engine = PandocEngine::new().unwrap();
        engine.close().unwrap();

        let result = engine.new_document();
        assert!(matches!(result, Err(EngineError::Unsupported(_))));
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let mut engine = PandocEngine::new().unwrap();
        let bogus = DocumentHandle::from_raw(999);

        let result = engine.set_text(bogus, " ");
        assert!(matches!(result, Err(EngineError::InvalidHandle(999))));
    }
}

//! Merge run errors and reporting.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;
use crate::filename::IndexedFile;

/// Errors fatal to a merge run.
///
/// Per-file failures (open, append) and export failures are not fatal; they
/// are logged and recorded in the [`MergeReport`]. Only a missing input
/// directory and accumulator-creation failures abort the run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The input directory does not exist; nothing to merge.
    #[error("input directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Listing the input directory failed.
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The engine could not create or seed the accumulator document.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Pipeline stage at which a file was dropped from the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipStage {
    /// Opening the source document failed.
    Open,
    /// Appending the document's content to the accumulator failed.
    Append,
}

/// A file that was eligible but did not make it into the merged output.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub stage: SkipStage,
    pub reason: String,
}

/// Outcome of one merge run.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Eligible files in merge order (ascending filename index).
    pub merge_order: Vec<IndexedFile>,

    /// Number of documents whose content reached the accumulator.
    pub appended: usize,

    /// Files dropped by a per-file failure, with the stage and reason.
    pub skipped: Vec<SkippedFile>,

    /// Path of the fixed-layout output, if the export succeeded.
    pub exported: Option<PathBuf>,

    /// Export failure reason, if the export failed.
    pub export_error: Option<String>,

    /// Path of the native-format backup, if the save succeeded.
    pub saved_native: Option<PathBuf>,

    /// Backup save failure reason, if the save failed.
    pub save_error: Option<String>,
}

impl MergeReport {
    /// Create a report for the given merge order.
    pub fn new(merge_order: Vec<IndexedFile>) -> Self {
        Self {
            merge_order,
            ..Self::default()
        }
    }

    /// Whether the fixed-layout export produced a file.
    pub fn export_succeeded(&self) -> bool {
        self.exported.is_some()
    }
}

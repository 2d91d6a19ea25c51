//! The merge orchestrator.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::MergeConfig;
use crate::engine::{DocumentEngine, EngineError};
use crate::filename::{self, IndexedFile};

use super::registry::HandleRegistry;
use super::types::{MergeError, MergeReport, SkipStage, SkippedFile};

/// Single blank placeholder seeded into the accumulator before any append,
/// so append primitives always have a non-empty target.
const ACCUMULATOR_SEED: &str = " ";

/// Drives one engine session through the merge pipeline.
///
/// The pipeline is strictly linear: scan, sort, open, accumulate, export,
/// save, release. Per-file failures are logged and skipped; only a missing
/// input directory or an accumulator-creation failure aborts the run. The
/// orchestrator assumes exclusive use of its engine session.
pub struct MergeOrchestrator<E: DocumentEngine> {
    engine: E,
    config: MergeConfig,
}

impl<E: DocumentEngine> MergeOrchestrator<E> {
    /// Create an orchestrator over an engine session.
    pub fn new(engine: E, config: MergeConfig) -> Self {
        Self { engine, config }
    }

    /// The merge configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// The underlying engine session.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run one merge over the configured input directory.
    ///
    /// Returns the report describing what was merged, skipped, exported,
    /// and saved. All handles acquired during the run are released before
    /// this returns, on success and on failure alike.
    pub fn merge_folder(&mut self) -> Result<MergeReport, MergeError> {
        let files = self.scan_input_dir()?;
        for file in &files {
            info!(file = %file.path.display(), index = file.index, "queued for merge");
        }

        let mut registry = HandleRegistry::new();
        let result = self.run_pipeline(files, &mut registry);
        registry.release_all(&mut self.engine);
        result
    }

    /// Tear down the engine session.
    pub fn shutdown(mut self) -> Result<(), EngineError> {
        self.engine.close()
    }

    /// List the input directory and return eligible files in merge order.
    ///
    /// Entries are enumerated in lexicographic name order so that index ties
    /// and reruns are deterministic, then stable-sorted ascending by index.
    fn scan_input_dir(&self) -> Result<Vec<IndexedFile>, MergeError> {
        let input_dir = &self.config.input_dir;
        if !input_dir.is_dir() {
            return Err(MergeError::DirectoryNotFound(input_dir.clone()));
        }

        let entries = fs::read_dir(input_dir).map_err(|e| MergeError::Scan {
            path: input_dir.clone(),
            source: e,
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MergeError::Scan {
                path: input_dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut files = Vec::new();
        for path in paths {
            if !filename::is_eligible(&path, &self.config.extension) {
                continue;
            }
            match filename::extract_index(&path) {
                Ok(index) => files.push(IndexedFile::new(path, index)),
                // Unreachable for eligible files; logged as a consistency
                // violation rather than aborting the run.
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "eligible file failed index extraction");
                }
            }
        }
        files.sort_by_key(|f| f.index);
        Ok(files)
    }

    fn run_pipeline(
        &mut self,
        files: Vec<IndexedFile>,
        registry: &mut HandleRegistry,
    ) -> Result<MergeReport, MergeError> {
        let mut report = MergeReport::new(files);

        // Open sources in merge order; an open failure drops that file only.
        let mut sources = Vec::new();
        for file in &report.merge_order {
            match self.engine.open_document(&file.path) {
                Ok(handle) => {
                    registry.track(handle);
                    sources.push((file.path.clone(), handle));
                }
                Err(e) => {
                    warn!(file = %file.path.display(), error = %e, "failed to open document, skipping");
                    report.skipped.push(SkippedFile {
                        path: file.path.clone(),
                        stage: SkipStage::Open,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Without an accumulator there is nothing to merge into; this is the
        // one engine failure fatal to the run.
        let accumulator = registry.track(self.engine.new_document()?);
        self.engine.set_text(accumulator, ACCUMULATOR_SEED)?;

        for (path, handle) in &sources {
            match self.engine.append_content(accumulator, *handle) {
                Ok(()) => report.appended += 1,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to append document, skipping");
                    report.skipped.push(SkippedFile {
                        path: path.clone(),
                        stage: SkipStage::Append,
                        reason: e.to_string(),
                    });
                }
            }
        }

        match self
            .engine
            .export_fixed_format(accumulator, &self.config.output_path)
        {
            Ok(()) => {
                info!(output = %self.config.output_path.display(), "fixed-layout export complete");
                report.exported = Some(self.config.output_path.clone());
            }
            Err(e) => {
                warn!(error = %e, "fixed-layout export failed");
                report.export_error = Some(e.to_string());
            }
        }

        match self.engine.save_native(accumulator, &self.config.backup_path) {
            Ok(()) => {
                info!(backup = %self.config.backup_path.display(), "native backup saved");
                report.saved_native = Some(self.config.backup_path.clone());
            }
            Err(e) => {
                warn!(error = %e, "native backup save failed");
                report.save_error = Some(e.to_string());
            }
        }

        Ok(report)
    }
}

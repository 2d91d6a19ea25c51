//! End-to-end merge pipeline tests over the in-memory engine.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use docmerge::config::MergeConfig;
use docmerge::engine::MemoryEngine;
use docmerge::merge::{MergeError, MergeOrchestrator};

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("MergeIn")).unwrap();
        Self { temp }
    }

    fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.temp.path().join("MergeIn").join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn config(&self) -> MergeConfig {
        MergeConfig::new(
            self.temp.path().join("MergeIn"),
            self.temp.path().join("merged.pdf"),
            self.temp.path().join("merged.docx"),
        )
    }

    fn exported(&self) -> String {
        fs::read_to_string(self.temp.path().join("merged.pdf")).unwrap()
    }

    fn backup(&self) -> String {
        fs::read_to_string(self.temp.path().join("merged.docx")).unwrap()
    }
}

#[test]
fn merges_numbered_documents_in_index_order() {
    let fixture = Fixture::new();
    // Deliberately created out of order; the trailing index decides
    fixture.write("intro2.docx", "second ");
    fixture.write("intro1.docx", "first ");
    fixture.write("appendix10.docx", "tenth");

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), fixture.config());
    let report = orchestrator.merge_folder().unwrap();

    let order: Vec<String> = report
        .merge_order
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(order, vec!["intro1.docx", "intro2.docx", "appendix10.docx"]);
    assert_eq!(report.appended, 3);
    assert!(report.export_succeeded());

    // Accumulator seed plus the three documents in index order
    assert_eq!(fixture.exported(), " first second tenth");
    orchestrator.shutdown().unwrap();
}

#[test]
fn backup_matches_exported_content() {
    let fixture = Fixture::new();
    fixture.write("a1.docx", "alpha ");
    fixture.write("a2.docx", "beta");

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), fixture.config());
    let report = orchestrator.merge_folder().unwrap();

    assert!(report.saved_native.is_some());
    assert_eq!(fixture.exported(), fixture.backup());
}

#[test]
fn numeric_order_beats_lexicographic_order() {
    let fixture = Fixture::new();
    fixture.write("doc1.docx", "1|");
    fixture.write("doc2.docx", "2|");
    fixture.write("doc10.docx", "10|");

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), fixture.config());
    orchestrator.merge_folder().unwrap();

    // Lexicographic order would give " 1|10|2|"
    assert_eq!(fixture.exported(), " 1|2|10|");
}

#[test]
fn ineligible_files_are_filtered_not_failed() {
    let fixture = Fixture::new();
    fixture.write("intro1.docx", "kept");
    fixture.write("notes.txt", "wrong extension");
    fixture.write("report.docx", "no trailing digit");
    fixture.write("3report.docx", "digit not trailing");

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), fixture.config());
    let report = orchestrator.merge_folder().unwrap();

    assert_eq!(report.merge_order.len(), 1);
    assert!(report.skipped.is_empty());
    assert_eq!(fixture.exported(), " kept");
}

#[test]
fn uppercase_extension_is_accepted() {
    let fixture = Fixture::new();
    fixture.write("REPORT3.DOCX", "shouting");

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), fixture.config());
    let report = orchestrator.merge_folder().unwrap();

    assert_eq!(report.merge_order.len(), 1);
    assert_eq!(report.merge_order[0].index, 3);
}

#[test]
fn missing_input_directory_is_the_only_fatal_error() {
    let temp = TempDir::new().unwrap();
    let config = MergeConfig::new(
        temp.path().join("DoesNotExist"),
        temp.path().join("merged.pdf"),
        temp.path().join("merged.docx"),
    );

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), config);
    let result = orchestrator.merge_folder();
    assert!(matches!(result, Err(MergeError::DirectoryNotFound(_))));

    // Nothing was acquired, nothing leaks
    let engine = orchestrator.engine();
    assert_eq!(engine.acquired_handles(), 0);
    assert_eq!(engine.released_handles(), 0);
}

#[test]
fn handle_release_parity_holds_under_failures() {
    let fixture = Fixture::new();
    let bad_open = fixture.write("part1.docx", "one");
    fixture.write("part2.docx", "two");
    let bad_append = fixture.write("part3.docx", "three");

    let mut engine = MemoryEngine::new();
    engine.fail_open_for(bad_open);
    engine.fail_append_for(bad_append);

    let mut orchestrator = MergeOrchestrator::new(engine, fixture.config());
    let report = orchestrator.merge_folder().unwrap();

    assert_eq!(report.appended, 1);
    assert_eq!(report.skipped.len(), 2);

    let engine = orchestrator.engine();
    assert_eq!(engine.acquired_handles(), engine.released_handles());
}

#[test]
fn export_failure_still_saves_backup_and_releases_handles() {
    let fixture = Fixture::new();
    fixture.write("a1.docx", "text");

    let mut engine = MemoryEngine::new();
    engine.fail_export();

    let mut orchestrator = MergeOrchestrator::new(engine, fixture.config());
    let report = orchestrator.merge_folder().unwrap();

    // The run completes; the failure is recorded, not propagated
    assert!(!report.export_succeeded());
    assert!(report
        .export_error
        .as_deref()
        .is_some_and(|r| r.contains("injected export failure")));
    assert!(!fixture.temp.path().join("merged.pdf").exists());

    // The native backup still lands
    assert_eq!(fixture.backup(), " text");

    let engine = orchestrator.engine();
    assert_eq!(engine.acquired_handles(), engine.released_handles());
}

#[test]
fn rerun_over_unchanged_input_produces_same_content() {
    let fixture = Fixture::new();
    fixture.write("ch1.docx", "one ");
    fixture.write("ch2.docx", "two");

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), fixture.config());
    orchestrator.merge_folder().unwrap();
    let first = fixture.exported();

    orchestrator.merge_folder().unwrap();
    let second = fixture.exported();

    assert_eq!(first, second);

    // Both runs balanced their handles
    let engine = orchestrator.engine();
    assert_eq!(engine.acquired_handles(), engine.released_handles());
}

#[test]
fn outputs_are_overwritten_unconditionally() {
    let fixture = Fixture::new();
    fixture.write("a1.docx", "fresh");
    fs::write(fixture.temp.path().join("merged.pdf"), "stale pdf").unwrap();
    fs::write(fixture.temp.path().join("merged.docx"), "stale docx").unwrap();

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), fixture.config());
    orchestrator.merge_folder().unwrap();

    assert_eq!(fixture.exported(), " fresh");
    assert_eq!(fixture.backup(), " fresh");
}

#[test]
fn leading_zero_indices_sort_numerically() {
    let fixture = Fixture::new();
    fixture.write("file007.docx", "seven|");
    fixture.write("file2.docx", "two|");

    let mut orchestrator = MergeOrchestrator::new(MemoryEngine::new(), fixture.config());
    let report = orchestrator.merge_folder().unwrap();

    let indices: Vec<u64> = report.merge_order.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![2, 7]);
    assert_eq!(fixture.exported(), " two|seven|");
}

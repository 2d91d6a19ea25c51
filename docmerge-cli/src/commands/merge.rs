//! Merge command - run the full merge pipeline.

use std::path::PathBuf;

use tracing::warn;

use docmerge::config::{ConfigFile, MergeConfig};
use docmerge::engine::{DocumentEngine, MemoryEngine, PandocEngine};
use docmerge::merge::{MergeOrchestrator, MergeReport};

use super::common::{resolve_backend, resolve_command, resolve_merge_config, EngineBackend};
use crate::error::CliError;

/// Arguments for the merge command.
#[derive(Debug, clap::Args)]
pub struct MergeArgs {
    /// Input folder containing numbered documents
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Fixed-layout (PDF) output path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Native-format backup path
    #[arg(long)]
    pub backup: Option<PathBuf>,

    /// Native document extension to accept (without dot)
    #[arg(long)]
    pub extension: Option<String>,

    /// Document engine backend
    #[arg(long, value_enum)]
    pub engine: Option<EngineBackend>,

    /// Converter command for the pandoc backend
    #[arg(long)]
    pub pandoc_command: Option<String>,
}

/// Run the merge command.
pub fn run(args: MergeArgs) -> Result<(), CliError> {
    let config_file = match ConfigFile::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable config file");
            ConfigFile::default()
        }
    };

    let merge_config = resolve_merge_config(&args, &config_file)?;
    let backend = resolve_backend(args.engine, &config_file);

    // Print banner
    println!("DocMerge v{}", docmerge::VERSION);
    println!("========================");
    println!();
    println!("Input:  {}", merge_config.input_dir.display());
    println!("Output: {}", merge_config.output_path.display());
    println!("Backup: {}", merge_config.backup_path.display());
    println!("Engine: {:?}", backend);
    println!();

    match backend {
        EngineBackend::Pandoc => {
            let command = resolve_command(args.pandoc_command, &config_file);
            let engine = PandocEngine::with_command(command)?;
            run_merge(engine, merge_config)
        }
        EngineBackend::Memory => run_merge(MemoryEngine::new(), merge_config),
    }
}

fn run_merge<E: DocumentEngine>(engine: E, config: MergeConfig) -> Result<(), CliError> {
    let mut orchestrator = MergeOrchestrator::new(engine, config);
    let result = orchestrator.merge_folder();

    if let Err(e) = orchestrator.shutdown() {
        warn!(error = %e, "failed to close engine session");
    }

    let report = result?;
    print_summary(&report);

    // The export is the point of the run; a merge that produced no
    // fixed-layout file exits non-zero even though per-file skips do not.
    if let Some(reason) = &report.export_error {
        return Err(CliError::ExportFailed(reason.clone()));
    }
    Ok(())
}

fn print_summary(report: &MergeReport) {
    println!(
        "Merged {} of {} document(s)",
        report.appended,
        report.merge_order.len()
    );

    for skipped in &report.skipped {
        println!(
            "  skipped {} ({:?}): {}",
            skipped.path.display(),
            skipped.stage,
            skipped.reason
        );
    }

    if let Some(exported) = &report.exported {
        println!("Exported: {}", exported.display());
    }
    if let Some(saved) = &report.saved_native {
        println!("Backup:   {}", saved.display());
    }
    if let Some(reason) = &report.save_error {
        println!("Backup save failed: {}", reason);
    }
}

//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;

use docmerge::config::{ConfigFile, MergeConfig};

use crate::commands::merge::MergeArgs;
use crate::error::CliError;

/// Document engine backend selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum EngineBackend {
    /// External pandoc converter (handles docx and PDF)
    Pandoc,
    /// In-memory engine over plain text (no external converter)
    Memory,
}

impl EngineBackend {
    /// Parse from config file string.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pandoc" => Some(EngineBackend::Pandoc),
            "memory" => Some(EngineBackend::Memory),
            _ => None,
        }
    }
}

/// Resolve the engine backend from CLI args and config.
pub fn resolve_backend(cli_backend: Option<EngineBackend>, config: &ConfigFile) -> EngineBackend {
    // CLI takes precedence, then config
    cli_backend
        .or_else(|| {
            config
                .engine
                .backend
                .as_deref()
                .and_then(EngineBackend::from_config_str)
        })
        .unwrap_or(EngineBackend::Pandoc)
}

/// Resolve the converter command for the pandoc backend.
pub fn resolve_command(cli_command: Option<String>, config: &ConfigFile) -> String {
    cli_command
        .or_else(|| config.engine.command.clone())
        .unwrap_or_else(|| "pandoc".to_string())
}

/// Resolve the merge configuration from CLI args, config file, and defaults.
///
/// Each path resolves independently: CLI, then config file, then the desktop
/// defaults. The desktop is only consulted when a path is still unset, so a
/// config file that pins every path works without a resolvable desktop.
pub fn resolve_merge_config(
    args: &MergeArgs,
    config: &ConfigFile,
) -> Result<MergeConfig, CliError> {
    let input = args.input.clone().or_else(|| config.merge.input_dir.clone());
    let output = args.output.clone().or_else(|| config.merge.output.clone());
    let backup = args.backup.clone().or_else(|| config.merge.backup.clone());
    let extension = args
        .extension
        .clone()
        .or_else(|| config.merge.extension.clone())
        .unwrap_or_else(|| docmerge::config::DEFAULT_EXTENSION.to_string());

    let (input, output, backup) = match (input, output, backup) {
        (Some(input), Some(output), Some(backup)) => (input, output, backup),
        (input, output, backup) => {
            let defaults = MergeConfig::from_desktop().map_err(|e| {
                CliError::Config(format!(
                    "{}. Use --input/--output/--backup or set paths in {}",
                    e,
                    docmerge::config::config_file_path().display()
                ))
            })?;
            (
                input.unwrap_or(defaults.input_dir),
                output.unwrap_or(defaults.output_path),
                backup.unwrap_or(defaults.backup_path),
            )
        }
    };

    Ok(MergeConfig::new(input, output, backup).with_extension(extension))
}

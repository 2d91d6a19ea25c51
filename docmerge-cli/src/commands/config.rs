//! Configuration inspection CLI commands.
//!
//! Provides `config show` and `config path` for viewing the effective
//! configuration and the configuration file location.

use clap::Subcommand;

use docmerge::config::{config_file_path, ConfigFile, MergeConfig};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_show(),
        ConfigCommands::Path => run_path(),
    }
}

/// Show the effective configuration after applying the config file.
fn run_show() -> Result<(), CliError> {
    let file = ConfigFile::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();

    println!("[merge]");
    match MergeConfig::from_desktop() {
        Ok(defaults) => {
            let effective = file.apply_to(defaults);
            println!("  input_dir = {}", effective.input_dir.display());
            println!("  output = {}", effective.output_path.display());
            println!("  backup = {}", effective.backup_path.display());
            println!("  extension = {}", effective.extension);
        }
        Err(_) => {
            // No desktop directory; only file-provided values are known
            let display = |v: &Option<std::path::PathBuf>| {
                v.as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            };
            println!("  input_dir = {}", display(&file.merge.input_dir));
            println!("  output = {}", display(&file.merge.output));
            println!("  backup = {}", display(&file.merge.backup));
            println!(
                "  extension = {}",
                file.merge.extension.as_deref().unwrap_or("docx")
            );
        }
    }

    println!();
    println!("[engine]");
    println!(
        "  backend = {}",
        file.engine.backend.as_deref().unwrap_or("pandoc")
    );
    println!(
        "  command = {}",
        file.engine.command.as_deref().unwrap_or("pandoc")
    );

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

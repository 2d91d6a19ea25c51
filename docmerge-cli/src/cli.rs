//! Command-line argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::config::ConfigCommands;
use crate::commands::merge::MergeArgs;

/// Merge numbered documents into a single fixed-layout file.
#[derive(Debug, Parser)]
#[command(name = "docmerge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge the numbered documents in the input folder
    Merge(MergeArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

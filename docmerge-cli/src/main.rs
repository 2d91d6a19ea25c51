//! DocMerge CLI - command-line interface
//!
//! This binary provides a command-line interface to the docmerge library.

mod cli;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Merge(args) => commands::merge::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Command-line interface implementation
//!
//! Thin clap layer over the library: parses arguments and dispatches to the
//! command implementations.

mod compile;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for successful runs
pub(crate) const EXIT_SUCCESS: u8 = 0;
/// Exit code for failed runs
pub(crate) const EXIT_ERROR: u8 = 1;

/// Stylepipe - compile stylesheet sources as a build pipeline stage
#[derive(Parser)]
#[command(name = "stylepipe")]
#[command(about = "Compile stylesheet sources to target stylesheets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the destinations map from stylepipe.toml
    Compile {
        /// Path to stylepipe.toml (default: walk up from the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Compile without writing destination files
        #[arg(long)]
        no_write: bool,

        /// Minify compiled output
        #[arg(long)]
        minify: bool,

        /// Print the outbound stage payload as JSON to stdout
        #[arg(long)]
        print_state: bool,
    },
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { config, no_write, minify, print_state } => {
            compile::run_compile(config.as_deref(), no_write, minify, print_state)
        }
    }
}

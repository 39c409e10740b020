//! Stylepipe - command-line entry point for standalone stage runs

use std::process::ExitCode;

use stylepipe::cli;

fn main() -> ExitCode {
    cli::run()
}

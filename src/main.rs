//! Tally CLI

use std::process::ExitCode;

use clap::Parser;

mod cli;

/// Tally CLI entry point
pub fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the user, not only to the log"
            )]
            {
                eprintln!("{error}");
            }

            ExitCode::FAILURE
        }
    }
}

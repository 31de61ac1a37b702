//! Execlock CLI entry point.
//!
//! Parses arguments, sets up logging, dispatches to the command handler, and
//! turns errors into exit codes.

use execlock::cli::Cli;
use execlock::{commands, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.global.verbose);

    match commands::dispatch(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}

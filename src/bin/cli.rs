// src/bin/cli.rs
use std::process::ExitCode;

use score_watch::cli;

fn main() -> ExitCode {
    if let Err(e) = color_eyre::install() {
        eprintln!("Error: {e}");
    }

    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            cli::pause("Press Enter to exit...");
            ExitCode::FAILURE
        }
    }
}

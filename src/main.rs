use std::process::ExitCode;

use clap::Parser;
use clipkeeper::bootstrap::run_app;
use clipkeeper::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_app(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("clipkeeper: {err:#}");
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

use clap::Parser;

use code_extractor::cli::Cli;
use code_extractor::ConfigError;

mod commands;

fn main() -> ExitCode {
    // Usage errors exit with status 2 from inside clap
    let cli = Cli::parse();

    match commands::extract::handle(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<ConfigError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

use std::process::ExitCode;

use clap::Parser;
use git_helper_cli::Cli;
use git_helper_cli::run_main;

fn main() -> ExitCode {
    match run_main(Cli::parse()) {
        Ok(exit_code) => exit_code,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

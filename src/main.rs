//! Entry point for the phototriage CLI application.

use clap::Parser;
use phototriage::{cli::Cli, error::ExitCode};

fn main() {
    let cli = Cli::parse();

    match phototriage::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            eprintln!(
                "[{}] Error: {:#}",
                ExitCode::GeneralError.code_prefix(),
                err
            );
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}

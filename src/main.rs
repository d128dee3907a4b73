use std::process::ExitCode;

use clap::Parser;
use keysync::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    if let Err(err) = keysync::telemetry::init(args.verbose()) {
        eprintln!("Error: {}", err);
        return ExitStatus::Error.into();
    }

    match keysync::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}

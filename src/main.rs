use std::process::ExitCode;

use clap::Parser;
use tornio::cli::{self, Args, ConsoleMessenger};
use tornio::{init_logging, TracingMessenger};

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = init_logging(args.log_level(), args.log_format()) {
        eprintln!("warning: logging unavailable: {e}");
    }

    let result = if args.log_messages {
        cli::run(args, TracingMessenger)
    } else {
        cli::run(args, ConsoleMessenger)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

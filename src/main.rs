//! `pqcsim` - post-quantum genomic pipeline simulator

use clap::Parser;

use pqcsim::cli::args::Cli;
use pqcsim::cli::commands;
use pqcsim::error::{ExitCode, SimulatorError};
use pqcsim::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(SimulatorError::Interrupted(code)) => {
            eprintln!("\ninterrupted");
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("error: {e}");
            if let SimulatorError::Config(pqcsim::error::ConfigError::ValidationError {
                errors,
                ..
            }) = &e
            {
                for issue in errors {
                    eprintln!("  {issue}");
                }
            }
            std::process::exit(e.exit_code());
        }
    }
}

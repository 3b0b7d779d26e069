//! Neoflix CLI
//!
//! Builds the Neo4j driver once, runs one favorites command and closes the
//! driver before exiting.

use clap::Parser;

use neoflix::cli::{run_cli_mode, Args, EXIT_FAILURE};
use neoflix::{logging, AppConfig};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(EXIT_FAILURE);
        }
    };

    if let Err(e) = logging::init(&config.log_level) {
        eprintln!("Error: {e:#}");
        std::process::exit(EXIT_FAILURE);
    }

    let exit_code = run_cli_mode(args, &config).await;
    std::process::exit(exit_code);
}

//! CLI dispatch
//!
//! Owns the driver lifecycle for one invocation: init at startup, run a
//! single command, close at shutdown.

use neoflix_databases::{
    DriverLifecycle, FavoriteStore, FavoritesRepository, ListOptions, Neo4jHandle,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::cli::{Args, Command, Error, FavoritesCommand, Result, EXIT_SUCCESS};
use crate::config::AppConfig;

/// Exit code wrapper for CLI operations
pub type ExitCode = i32;

/// Run the parsed command and return the process exit code.
///
/// Command output goes to stdout as pretty JSON, errors to stderr.
pub async fn run_cli_mode(args: Args, config: &AppConfig) -> ExitCode {
    let lifecycle = DriverLifecycle::new();

    let handle = match lifecycle.init(&config.neo4j).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Neo4j driver initialization failed: {e}");
            eprintln!("Error: {e}");
            return Error::from(e).exit_code();
        }
    };

    let outcome = run_command(args.command, handle).await;
    lifecycle.close().await;

    match outcome {
        Ok(output) => {
            println!("{output}");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}

async fn run_command(command: Command, handle: Neo4jHandle) -> Result<String> {
    let value = match command {
        Command::Ping => {
            handle.verify_connectivity().await?;
            json!({ "status": "ok", "uri": handle.uri() })
        }
        Command::Favorites(command) => {
            let repository = FavoritesRepository::new(handle);
            execute_favorites(&repository, command).await?
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}

/// Execute a favorites subcommand against any store
pub async fn execute_favorites(
    store: &dyn FavoriteStore,
    command: FavoritesCommand,
) -> Result<Value> {
    if command.user().trim().is_empty() {
        return Err(Error::InvalidArgs("--user cannot be empty".to_string()));
    }

    debug!("Executing favorites command: {command:?}");

    match command {
        FavoritesCommand::List {
            user,
            sort,
            order,
            limit,
            skip,
        } => {
            let options = ListOptions::parse(&sort, &order, limit, skip)?;
            let movies = store.all(&user, &options).await?;
            Ok(serde_json::to_value(movies)?)
        }
        FavoritesCommand::Add { user, movie } => {
            let movie = store.add(&user, &movie).await?;
            Ok(serde_json::to_value(movie)?)
        }
        FavoritesCommand::Remove { user, movie } => {
            let movie = store.remove(&user, &movie).await?;
            Ok(serde_json::to_value(movie)?)
        }
    }
}

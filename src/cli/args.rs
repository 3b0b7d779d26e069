//! CLI argument parsing
//!
//! ```text
//! neoflix [--config PATH] favorites list --user ID [--sort F] [--order O] [--limit N] [--skip N]
//! neoflix [--config PATH] favorites add --user ID --movie ID
//! neoflix [--config PATH] favorites remove --user ID --movie ID
//! neoflix [--config PATH] ping
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parsed CLI arguments
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "neoflix", version, about = "Manage Neoflix favorites stored in Neo4j")]
pub struct Args {
    /// Configuration file (TOML). Defaults to ./neoflix.toml when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Work with a user's favorites list
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// Check that Neo4j is reachable with the configured credentials
    Ping,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum FavoritesCommand {
    /// List a page of the user's favorite movies
    List {
        #[arg(long)]
        user: String,

        /// Movie property to sort by
        #[arg(long, default_value = "title")]
        sort: String,

        /// ASC or DESC
        #[arg(long, default_value = "ASC")]
        order: String,

        #[arg(long, default_value_t = 6)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        skip: u32,
    },

    /// Add a movie to the user's favorites
    Add {
        #[arg(long)]
        user: String,

        /// tmdbId of the movie
        #[arg(long)]
        movie: String,
    },

    /// Remove a movie from the user's favorites
    Remove {
        #[arg(long)]
        user: String,

        /// tmdbId of the movie
        #[arg(long)]
        movie: String,
    },
}

impl FavoritesCommand {
    pub fn user(&self) -> &str {
        match self {
            FavoritesCommand::List { user, .. }
            | FavoritesCommand::Add { user, .. }
            | FavoritesCommand::Remove { user, .. } => user,
        }
    }
}

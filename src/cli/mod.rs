//! CLI module
//!
//! Provides:
//! - Argument parsing for the favorites commands
//! - Dispatch against a [`FavoriteStore`](neoflix_databases::FavoriteStore)
//! - Exit code mapping

pub mod args;
pub mod dispatch;

// Re-exports
pub use args::{Args, Command, FavoritesCommand};
pub use dispatch::{execute_favorites, run_cli_mode, ExitCode};

use neoflix_databases::StoreError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Deterministic exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgs(_) => EXIT_FAILURE,
            Error::Store(
                StoreError::NotFound { .. }
                | StoreError::InvalidSort(_)
                | StoreError::InvalidOrder(_)
                | StoreError::InvalidConfig(_),
            ) => EXIT_FAILURE,
            Error::Store(_) => EXIT_DB_ERROR,
            Error::Serialization(_) => EXIT_FAILURE,
        }
    }
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_DB_ERROR: i32 = 2;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

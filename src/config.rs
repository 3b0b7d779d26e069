//! Application configuration
//!
//! Layers, later wins: built-in defaults, an optional TOML file, then
//! environment variables such as `NEOFLIX__NEO4J__URI`.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use neoflix_databases::Neo4jConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default environment prefix
pub const ENV_PREFIX: &str = "NEOFLIX";

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "neoflix.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Neo4j connection settings
    pub neo4j: Neo4jConfig,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            neo4j: Neo4jConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration using the `NEOFLIX` environment prefix.
    ///
    /// An explicit `path` must exist; without one, `neoflix.toml` is used
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())
            .context("Failed to build default configuration")?;

        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let config: AppConfig = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        config
            .neo4j
            .validate()
            .context("Invalid configuration")?;

        debug!("Loaded configuration for Neo4j at {}", config.neo4j.uri);
        Ok(config)
    }
}

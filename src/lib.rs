//! Neoflix: favorites lists for a Neo4j movie graph
//!
//! The data-access layer lives in the `neoflix-databases` crate; this crate
//! is the composition root: configuration, logging and the CLI.

pub mod cli;
pub mod config;
pub mod logging;

pub use crate::config::AppConfig;

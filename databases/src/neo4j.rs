//! Neo4j driver lifecycle
//!
//! [`DriverLifecycle`] owns the single live connection pool of the
//! application. The composition root initializes it once at startup, hands
//! the resulting [`Neo4jHandle`] to repositories and closes it at shutdown.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use neo4rs::{query, ConfigBuilder, Graph};

use crate::errors::{Result, StoreError};

/// Neo4j connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    /// Neo4j connection URI
    pub uri: String,
    /// Username for basic authentication
    pub username: String,
    /// Password for basic authentication
    pub password: String,
    /// Database name (Neo4j 4.x+)
    pub database: String,
    /// Upper bound of pooled connections
    pub max_connections: usize,
    /// Rows pulled per round trip
    pub fetch_size: usize,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            username: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 200,
        }
    }
}

impl Neo4jConfig {
    pub fn new(
        uri: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(StoreError::InvalidConfig("uri cannot be empty".to_string()));
        }
        if self.username.is_empty() {
            return Err(StoreError::InvalidConfig(
                "username cannot be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(StoreError::InvalidConfig(
                "max_connections must be greater than 0".to_string(),
            ));
        }
        if self.fetch_size == 0 {
            return Err(StoreError::InvalidConfig(
                "fetch_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared handle to a verified Neo4j connection pool
///
/// Cloning is cheap; every clone talks to the same pool. Each query checks a
/// connection out of the pool for its own duration only.
#[derive(Clone)]
pub struct Neo4jHandle {
    graph: Arc<Graph>,
    uri: Arc<str>,
}

impl std::fmt::Debug for Neo4jHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jHandle").field("uri", &self.uri).finish()
    }
}

impl Neo4jHandle {
    /// Build the pool and verify the server answers before returning
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        config.validate()?;

        let connection_error = |reason: String| StoreError::Connection {
            uri: config.uri.clone(),
            reason,
        };

        let driver_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .fetch_size(config.fetch_size)
            .max_connections(config.max_connections)
            .build()
            .map_err(|e| connection_error(e.to_string()))?;

        let graph = Graph::connect(driver_config)
            .await
            .map_err(|e| connection_error(e.to_string()))?;

        let handle = Self {
            graph: Arc::new(graph),
            uri: Arc::from(config.uri.as_str()),
        };

        handle.verify_connectivity().await.map_err(|e| {
            error!("Neo4j connectivity check failed: {e}");
            connection_error(e.to_string())
        })?;

        Ok(handle)
    }

    /// Run a trivial query to prove the server is reachable and the
    /// credentials are accepted
    pub async fn verify_connectivity(&self) -> Result<()> {
        debug!("Verifying Neo4j connectivity to {}", self.uri);

        let start_time = std::time::Instant::now();
        let mut result = self.graph.execute(query("RETURN 1 AS ok")).await?;

        let ok = match result.next().await? {
            Some(row) => row.get::<i64>("ok")? == 1,
            None => false,
        };

        if !ok {
            return Err(StoreError::Connection {
                uri: self.uri.to_string(),
                reason: "connectivity check returned an unexpected result".to_string(),
            });
        }

        debug!(
            "Neo4j connectivity verified in {}ms",
            start_time.elapsed().as_millis()
        );
        Ok(())
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub(crate) fn graph(&self) -> &Graph {
        &self.graph
    }
}

/// Owner of the application's Neo4j handle
///
/// State moves uninitialized -> initialized -> closed (= uninitialized).
#[derive(Debug, Default)]
pub struct DriverLifecycle {
    handle: RwLock<Option<Neo4jHandle>>,
}

impl DriverLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect with basic auth, verify connectivity and store the handle.
    ///
    /// Fails with [`StoreError::Connection`] when the server is unreachable
    /// or rejects the credentials, and with [`StoreError::AlreadyInitialized`]
    /// while a previous handle is still live.
    pub async fn init(&self, config: &Neo4jConfig) -> Result<Neo4jHandle> {
        let mut slot = self.handle.write().await;
        if slot.is_some() {
            return Err(StoreError::AlreadyInitialized);
        }

        let handle = Neo4jHandle::connect(config).await?;
        *slot = Some(handle.clone());
        drop(slot);

        info!("Neo4j driver initialized for {}", config.uri);
        Ok(handle)
    }

    /// The handle stored by [`DriverLifecycle::init`]
    pub async fn get(&self) -> Result<Neo4jHandle> {
        self.handle
            .read()
            .await
            .clone()
            .ok_or(StoreError::NotInitialized)
    }

    /// Release the stored handle. Returns false if there was nothing to close.
    pub async fn close(&self) -> bool {
        let mut slot = self.handle.write().await;
        match slot.take() {
            Some(handle) => {
                drop(slot);
                info!("Neo4j driver closed for {}", handle.uri());
                true
            }
            None => {
                debug!("Neo4j driver already closed");
                false
            }
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.handle.read().await.is_some()
    }
}

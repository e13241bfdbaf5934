//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query};
use usergraph_core::config::Neo4jSettings;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("{label} is missing property {property}: {reason}")]
    MissingProperty {
        label: &'static str,
        property: &'static str,
        reason: String,
    },

    #[error("Query result is missing column {column}: {reason}")]
    MissingColumn {
        column: &'static str,
        reason: String,
    },

    #[error("{operation} returned no rows")]
    EmptyResult { operation: &'static str },

    #[error("Relationship endpoint not found: {from_user_id} -> {to_user_id}")]
    EndpointNotFound {
        from_user_id: String,
        to_user_id: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// This is the only owner of connections to the store. Clone is cheap
/// (inner Arc). Every query checks a connection out of the pool for its
/// own duration and hands it back when the result stream is dropped.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        tracing::debug!(rows = rows.len(), "Query returned");
        Ok(rows)
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }

    /// Round-trip a trivial query. Failures are logged and reported as `false`.
    pub async fn verify_connection(&self) -> bool {
        match self.query_one(neo4rs::query("RETURN 1 AS test")).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Neo4j connection check failed");
                false
            }
        }
    }

    /// Release this handle on the connection pool.
    ///
    /// The pool is torn down once the last clone is closed or dropped.
    pub fn close(self) {
        drop(self.graph);
        tracing::info!("Closed Neo4j connection");
    }
}

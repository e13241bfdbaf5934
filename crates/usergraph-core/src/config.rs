//! Configuration management for usergraph services.
//!
//! Configuration is loaded from (in priority order):
//! 1. `NEO4J_URI` / `NEO4J_USERNAME` / `NEO4J_PASSWORD`
//! 2. Environment variables (`USERGRAPH__` prefix, `__` separator)
//! 3. Config file (`usergraph.toml`)
//! 4. Defaults
//!
//! The defaults are only suitable for local development.

use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::UsergraphError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsergraphConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

/// Connection settings for the graph store.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Upper bound on pooled Bolt connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Origins allowed by CORS. Empty disables CORS headers, `*` allows any.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, UsergraphError> {
        self.bind_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| UsergraphError::InvalidConfig {
                key: "server.bind_addr".to_string(),
                message: e.to_string(),
            })
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origins: Vec::new(),
        }
    }
}

impl UsergraphConfig {
    /// Load configuration from `<file_prefix>.toml` (optional) and the environment.
    pub fn load(file_prefix: &str) -> Result<Self, UsergraphError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("USERGRAPH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option("neo4j.uri", std::env::var("NEO4J_URI").ok())?
            .set_override_option("neo4j.user", std::env::var("NEO4J_USERNAME").ok())?
            .set_override_option("neo4j.password", std::env::var("NEO4J_PASSWORD").ok())?
            .build()?;

        let loaded: Self = cfg.try_deserialize()?;
        tracing::debug!(
            uri = %loaded.neo4j.uri,
            bind_addr = %loaded.server.bind_addr,
            "Loaded configuration"
        );
        Ok(loaded)
    }
}

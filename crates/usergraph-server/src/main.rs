//! CLI entry point for the usergraph HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use usergraph_core::config::{ServerSettings, UsergraphConfig};
use usergraph_graph::{GraphClient, GraphConfig, MemoryStore, UserStore};
use usergraph_server::{build_router, AppState};

#[derive(Parser)]
#[command(name = "usergraph-server")]
#[command(about = "HTTP API for users and their relationships, backed by Neo4j")]
struct Cli {
    /// Config file prefix (default: usergraph).
    #[arg(short, long, default_value = "usergraph")]
    config: String,

    /// Override the listen address, e.g. 0.0.0.0:3000.
    #[arg(long)]
    bind: Option<String>,

    /// Keep data in process memory instead of connecting to Neo4j.
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let mut config = UsergraphConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    let addr = config.server.socket_addr()?;

    if cli.memory {
        tracing::warn!("Using in-memory store; data is discarded on exit");
        return serve(Arc::new(MemoryStore::new()), &config.server, addr).await;
    }

    let graph = GraphClient::connect(&GraphConfig::from(&config.neo4j)).await?;
    if !graph.verify_connection().await {
        anyhow::bail!("Neo4j at {} did not answer the connection check", config.neo4j.uri);
    }

    let served = serve(Arc::new(graph.clone()), &config.server, addr).await;
    graph.close();
    served
}

async fn serve(
    store: Arc<dyn UserStore>,
    settings: &ServerSettings,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let app = build_router(AppState::new(store), settings);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "usergraph-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

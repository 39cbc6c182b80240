//! Highlight search REST API server
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin highlight_server --features server
//!
//! curl -X POST http://localhost:8000/query \
//!   -H "Content-Type: application/json" \
//!   -d '{"query": "Wembanyama fadeaways in the playoffs"}'
//!
//! curl http://localhost:8000/random
//! ```
//!
//! Configuration comes from `HIGHLIGHT_*` environment variables (a `.env`
//! file is honoured) and `HIGHLIGHT_PORT` picks the port.

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use highlight_search::api::create_router;
use highlight_search::{EngineConfig, SearchEngine};

const DEFAULT_PORT: u16 = 8000;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "highlight_search=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting highlight search server");

    let config = EngineConfig::from_env().context("Failed to load configuration")?;

    // The stats client is blocking: build it before the runtime exists and
    // keep a handle so it is dropped after the runtime shuts down.
    let engine = Arc::new(SearchEngine::from_config(config).context("Failed to start engine")?);
    let stats = engine.directory().stats();
    tracing::info!(
        players = stats.player_count,
        teams = stats.team_count,
        "Reference directory loaded"
    );

    let port = match std::env::var("HIGHLIGHT_PORT") {
        Ok(value) => value
            .parse::<u16>()
            .with_context(|| format!("Invalid HIGHLIGHT_PORT: {value}"))?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(serve(engine.clone(), addr))?;

    Ok(())
}

async fn serve(engine: Arc<SearchEngine>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(engine);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

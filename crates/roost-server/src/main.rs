//! Roost server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `ROOST_*`
//! environment overrides, opens a SQLite store, and serves the JSON API over
//! HTTP.
//!
//! ```sh
//! ROOST_PORT=3000 cargo run -p roost-server -- --config ./config.toml
//! ```

mod config;
mod seed;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roost_core::service::CatalogService;
use roost_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Roost booking server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  let store = match server_cfg.resolved_store_path() {
    Some(path) => SqliteStore::open(&path)
      .await
      .with_context(|| format!("failed to open store at {path:?}"))?,
    None => {
      tracing::warn!("no store_path configured; data will not survive a restart");
      SqliteStore::open_in_memory()
        .await
        .context("failed to open in-memory store")?
    }
  };

  let store = Arc::new(store);

  if server_cfg.seed_sample_catalog {
    let catalog = CatalogService::new(Arc::clone(&store));
    let seeded = seed::seed_if_empty(&catalog)
      .await
      .context("failed to seed sample catalog")?;
    if seeded > 0 {
      tracing::info!(seeded, "loaded sample catalog");
    }
  }

  let app = roost_api::api_router(store).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

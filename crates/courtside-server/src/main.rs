//! courtside server binary.
//!
//! Reads `courtside.toml` (or the path given with `--config`), layers
//! `COURTSIDE_*` environment variables on top, opens the event and league
//! stores, and serves the JSON API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use courtside_server::ServerConfig;
use courtside_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "courtside scoring server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "courtside.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("COURTSIDE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let scoreboard = server_cfg
    .scoreboard()
    .context("invalid home_team / away_team")?;

  // Open the two stores. Pointing both paths at one file shares a connection.
  let events_path = expand_tilde(&server_cfg.events_path);
  let league_path = expand_tilde(&server_cfg.league_path);
  let options = server_cfg.store_options();

  let events = SqliteStore::open_with(&events_path, options)
    .await
    .with_context(|| format!("failed to open event store at {events_path:?}"))?;
  let league = if league_path == events_path {
    events.clone()
  } else {
    SqliteStore::open_with(&league_path, options)
      .await
      .with_context(|| format!("failed to open league store at {league_path:?}"))?
  };

  let app = courtside_server::app(Arc::new(events), Arc::new(league), scoreboard);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

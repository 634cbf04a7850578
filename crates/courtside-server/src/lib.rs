//! HTTP host for the courtside API.
//!
//! Owns the runtime configuration and wraps [`courtside_api::api_router`]
//! with request tracing. The binary in `main.rs` opens the stores and binds
//! the listener.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::Router;
use courtside_core::{
  aggregate::Scoreboard,
  store::{EventStore, MatchStore},
};
use courtside_store_sqlite::StoreOptions;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `courtside.toml` and
/// `COURTSIDE_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// SQLite file holding the event log.
  pub events_path:     PathBuf,
  /// SQLite file holding league matches. May equal `events_path`.
  pub league_path:     PathBuf,
  /// How long a write waits on a locked database before reporting busy.
  pub busy_timeout_ms: u64,
  pub home_team:       String,
  pub away_team:       String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let scoreboard = Scoreboard::default();
    Self {
      host:            "127.0.0.1".to_owned(),
      port:            8080,
      events_path:     PathBuf::from("courtside-events.db"),
      league_path:     PathBuf::from("courtside-league.db"),
      busy_timeout_ms: 3000,
      home_team:       scoreboard.home,
      away_team:       scoreboard.away,
    }
  }
}

impl ServerConfig {
  pub fn store_options(&self) -> StoreOptions {
    StoreOptions { busy_timeout: Duration::from_millis(self.busy_timeout_ms) }
  }

  pub fn scoreboard(&self) -> courtside_core::Result<Scoreboard> {
    Scoreboard::new(&self.home_team, &self.away_team)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: every API route plus a tracing layer.
pub fn app<E, M>(events: Arc<E>, matches: Arc<M>, scoreboard: Scoreboard) -> Router
where
  E: EventStore + 'static,
  M: MatchStore + 'static,
{
  courtside_api::api_router(events, matches, scoreboard).layer(TraceLayer::new_for_http())
}

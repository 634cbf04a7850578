//! [`SqliteStore`]: the SQLite implementation of [`EventStore`] and
//! [`MatchStore`].

use std::{collections::BTreeSet, path::Path, time::Duration};

use chrono::Utc;
use rusqlite::TransactionBehavior;
use tracing::{debug, info, warn};

use courtside_core::{
  event::{Event, EventId, NewEvent},
  league::{Match, MatchId, NewMatch},
  store::{EventStore, MatchStore, ScanOrder},
};

use crate::{
  encode::{encode_dt, encode_winner, RawEvent, RawMatch},
  schema::SCHEMA,
  Error, Result,
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Connection settings applied when a store is opened.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
  /// How long a write waits for another connection's lock before failing
  /// with [`Error::Busy`].
  pub busy_timeout: Duration,
}

impl Default for StoreOptions {
  fn default() -> Self { Self { busy_timeout: Duration::from_millis(3000) } }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A courtside store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted, and every
/// clone shares the same writer thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with default options.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(path, StoreOptions::default()).await
  }

  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(options).await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(StoreOptions::default()).await?;
    Ok(store)
  }

  async fn init_schema(&self, options: StoreOptions) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(options.busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the connection, bypassing validation.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn append(&self, input: NewEvent) -> Result<Event> {
    input.validate()?;
    let created_at = Utc::now();
    let created_str = encode_dt(created_at);

    let row = input.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events
             (class, team, bib_type, uniform_number, player_name,
              action, quarter, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            row.class,
            row.team,
            row.bib_type,
            row.uniform_number,
            row.player_name,
            row.action.as_str(),
            row.quarter.as_str(),
            created_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(id, action = input.action.as_str(), "event appended");
    Ok(Event {
      id: EventId(id),
      class: input.class,
      team: input.team,
      bib_type: input.bib_type,
      uniform_number: input.uniform_number,
      player_name: input.player_name,
      action: input.action,
      quarter: input.quarter,
      created_at,
    })
  }

  async fn delete<'a>(&'a self, ids: &'a BTreeSet<EventId>) -> Result<usize> {
    if ids.is_empty() {
      return Ok(0);
    }
    let raw_ids: Vec<i64> = ids.iter().map(|id| id.0).collect();

    let deleted = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; raw_ids.len()].join(", ");
        let sql = format!("DELETE FROM events WHERE id IN ({placeholders})");
        Ok(conn.execute(&sql, rusqlite::params_from_iter(raw_ids))?)
      })
      .await?;

    debug!(requested = ids.len(), deleted, "events deleted");
    Ok(deleted)
  }

  async fn delete_last(&self, id: EventId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM events WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn scan(&self, order: ScanOrder) -> Result<Vec<Event>> {
    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let rows = match order {
          ScanOrder::All => {
            let mut stmt = conn
              .prepare(&format!("SELECT {} FROM events ORDER BY id ASC", RawEvent::COLUMNS))?;
            stmt
              .query_map([], RawEvent::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
          ScanOrder::Recent(n) => {
            let limit = i64::try_from(n).unwrap_or(i64::MAX);
            let mut stmt = conn.prepare(&format!(
              "SELECT {} FROM events ORDER BY id DESC LIMIT ?1",
              RawEvent::COLUMNS
            ))?;
            let mut rows = stmt
              .query_map(rusqlite::params![limit], RawEvent::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.reverse();
            rows
          }
        };
        Ok(rows)
      })
      .await?;

    let mut events = Vec::with_capacity(raws.len());
    for raw in raws {
      let id = raw.id;
      match raw.into_event() {
        Ok(event) => events.push(event),
        Err(Error::Core(e)) => warn!(id, error = %e, "skipping event with unknown label"),
        Err(e) => return Err(e),
      }
    }
    Ok(events)
  }

  async fn wipe_all(&self) -> Result<()> {
    let deleted = self
      .conn
      .call(|conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let deleted = tx.execute("DELETE FROM events", [])?;
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'events'", [])?;
        tx.commit()?;
        if let Err(e) = conn.execute_batch("VACUUM") {
          warn!(error = %e, "vacuum after wipe failed");
        }
        Ok(deleted)
      })
      .await?;

    info!(deleted, "event log wiped");
    Ok(())
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  async fn record_match(&self, input: NewMatch) -> Result<Match> {
    input.validate()?;
    let (winner, point_diff) = input.outcome();
    let created_at = Utc::now();

    let row = input.clone();
    let winner_str = encode_winner(&winner);
    let created_str = encode_dt(created_at);
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO league_matches
             (team_1, team_2, score_1, score_2, winner, point_diff, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            row.team_1,
            row.team_2,
            row.score_1,
            row.score_2,
            winner_str,
            point_diff,
            created_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(id, team_1 = %input.team_1, team_2 = %input.team_2, "match recorded");
    Ok(Match {
      id: MatchId(id),
      team_1: input.team_1,
      team_2: input.team_2,
      score_1: input.score_1,
      score_2: input.score_2,
      winner,
      point_diff,
      created_at,
    })
  }

  async fn delete_match(&self, id: MatchId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM league_matches WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn list_matches(&self) -> Result<Vec<Match>> {
    let raws: Vec<RawMatch> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM league_matches ORDER BY id DESC",
          RawMatch::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawMatch::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatch::into_match).collect()
  }
}

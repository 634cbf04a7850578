//! The `EventStore` and `MatchStore` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `courtside-store-sqlite`). Higher layers (`courtside-api`) depend on these
//! abstractions, not on any concrete backend.

use std::{collections::BTreeSet, future::Future};

use crate::{
  event::{Event, EventId, NewEvent},
  league::{Match, MatchId, NewMatch},
};

// ─── Scan order ──────────────────────────────────────────────────────────────

/// Which slice of the event log [`EventStore::scan`] returns. Either way the
/// result is ordered by id ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
  /// Every event.
  #[default]
  All,
  /// The last `n` events by id.
  Recent(usize),
}

// ─── Error classification ────────────────────────────────────────────────────

/// What callers need to know about a backend error without naming its type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The input failed validation; nothing was written.
  fn validation(&self) -> Option<&crate::Error>;

  /// The store could not take its lock within the configured wait. The call
  /// may be retried.
  fn is_busy(&self) -> bool;
}

// ─── Event store ─────────────────────────────────────────────────────────────

/// Append-only, id-ordered log of scoring events.
///
/// Every mutating call is durable before it returns. Deletes are idempotent:
/// an id that does not exist is silently skipped.
pub trait EventStore: Send + Sync {
  type Error: StoreError;

  /// Validate and persist a new event. `id` and `created_at` are assigned by
  /// the store.
  fn append(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// Remove every event whose id is in `ids`. Returns how many rows existed.
  fn delete<'a>(
    &'a self,
    ids: &'a BTreeSet<EventId>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Undo a single insertion. Returns `false` if it was already gone.
  fn delete_last(
    &self,
    id: EventId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Read a snapshot of the log, always in ascending id order.
  fn scan(
    &self,
    order: ScanOrder,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  /// Delete every event and restart the id sequence at 1.
  ///
  /// Irreversible. Callers must obtain explicit confirmation before invoking
  /// it; the store performs none.
  fn wipe_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Match store ─────────────────────────────────────────────────────────────

/// Append-only log of league match results.
pub trait MatchStore: Send + Sync {
  type Error: StoreError;

  /// Validate and persist a match, computing its winner and point difference.
  /// A self-match is rejected without writing anything.
  fn record_match(
    &self,
    input: NewMatch,
  ) -> impl Future<Output = Result<Match, Self::Error>> + Send + '_;

  /// Remove a match. Returns `false` if it was already gone.
  fn delete_match(
    &self,
    id: MatchId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All matches, most recent first.
  fn list_matches(
    &self,
  ) -> impl Future<Output = Result<Vec<Match>, Self::Error>> + Send + '_;
}

//! Integration tests for `SqliteStore` against an in-memory database.

use std::{collections::BTreeSet, time::Duration};

use courtside_core::{
  event::{Action, EventId, NewEvent, Quarter},
  league::{MatchId, MatchWinner, NewMatch},
  store::{EventStore, MatchStore, ScanOrder, StoreError},
};

use crate::{Error, SqliteStore, StoreOptions};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn event(team: &str, number: &str, action: Action) -> NewEvent {
  NewEvent {
    class:          "beginner".into(),
    team:           team.into(),
    bib_type:       "home".into(),
    uniform_number: number.into(),
    player_name:    format!("Player {number}"),
    action,
    quarter:        Quarter::Q1,
  }
}

fn ids(events: &[courtside_core::event::Event]) -> Vec<i64> {
  events.iter().map(|e| e.id.0).collect()
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_assigns_increasing_ids() {
  let s = store().await;
  let a = s.append(event("Red", "4", Action::ThreePoint)).await.unwrap();
  let b = s.append(event("Blue", "9", Action::Foul)).await.unwrap();

  assert_eq!(a.id, EventId(1));
  assert!(b.id > a.id);
  assert_eq!(a.points(), 3);

  let all = s.scan(ScanOrder::All).await.unwrap();
  assert_eq!(all, vec![a, b]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_get_dense_unique_ids() {
  const N: i64 = 64;
  let s = std::sync::Arc::new(store().await);

  let handles: Vec<_> = (1..=N)
    .map(|n| {
      let s = s.clone();
      tokio::spawn(async move { s.append(event("Red", &n.to_string(), Action::Steal)).await })
    })
    .collect();

  let mut assigned = Vec::new();
  for handle in handles {
    assigned.push(handle.await.unwrap().unwrap().id.0);
  }
  assigned.sort_unstable();
  assert_eq!(assigned, (1..=N).collect::<Vec<_>>());

  let stored = s.scan(ScanOrder::All).await.unwrap();
  assert_eq!(ids(&stored), assigned);
}

#[tokio::test]
async fn append_rejects_blank_labels() {
  let s = store().await;
  let mut input = event("Red", "4", Action::Assist);
  input.player_name = "  ".into();

  let err = s.append(input).await.unwrap_err();
  assert_eq!(
    err.validation(),
    Some(&courtside_core::Error::EmptyField("player_name"))
  );
  assert!(s.scan(ScanOrder::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn scan_recent_returns_tail_in_ascending_order() {
  let s = store().await;
  for n in 1..=5 {
    s.append(event("Red", &n.to_string(), Action::Rebound)).await.unwrap();
  }

  let recent = s.scan(ScanOrder::Recent(2)).await.unwrap();
  assert_eq!(ids(&recent), vec![4, 5]);

  let more_than_exists = s.scan(ScanOrder::Recent(50)).await.unwrap();
  assert_eq!(ids(&more_than_exists), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn delete_is_idempotent() {
  let s = store().await;
  for n in 1..=3 {
    s.append(event("Red", &n.to_string(), Action::Steal)).await.unwrap();
  }

  let targets: BTreeSet<_> = [EventId(2), EventId(99)].into();
  assert_eq!(s.delete(&targets).await.unwrap(), 1);
  assert_eq!(s.delete(&targets).await.unwrap(), 0);
  assert_eq!(s.delete(&BTreeSet::new()).await.unwrap(), 0);

  let left = s.scan(ScanOrder::All).await.unwrap();
  assert_eq!(ids(&left), vec![1, 3]);
}

#[tokio::test]
async fn delete_last_undoes_one_insertion() {
  let s = store().await;
  s.append(event("Red", "4", Action::TwoPoint)).await.unwrap();
  let last = s.append(event("Red", "4", Action::ThreePoint)).await.unwrap();

  assert!(s.delete_last(last.id).await.unwrap());
  assert!(!s.delete_last(last.id).await.unwrap());

  let left = s.scan(ScanOrder::All).await.unwrap();
  assert_eq!(ids(&left), vec![1]);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
  let s = store().await;
  let first = s.append(event("Red", "4", Action::OnePoint)).await.unwrap();
  s.delete_last(first.id).await.unwrap();

  let second = s.append(event("Red", "4", Action::OnePoint)).await.unwrap();
  assert_eq!(second.id, EventId(2));
}

#[tokio::test]
async fn wipe_all_empties_log_and_restarts_ids() {
  let s = store().await;
  for n in 1..=3 {
    s.append(event("Blue", &n.to_string(), Action::Block)).await.unwrap();
  }

  s.wipe_all().await.unwrap();
  assert!(s.scan(ScanOrder::All).await.unwrap().is_empty());

  let fresh = s.append(event("Blue", "1", Action::Block)).await.unwrap();
  assert_eq!(fresh.id, EventId(1));
}

#[tokio::test]
async fn scan_skips_rows_with_unknown_labels() {
  let s = store().await;
  s.append(event("Red", "4", Action::ThreePoint)).await.unwrap();
  s.execute_raw(
    "INSERT INTO events
       (class, team, bib_type, uniform_number, player_name, action, quarter, created_at)
     VALUES ('beginner', 'Red', '', '4', 'Sato', 'dunk', 'Q1', '2024-01-01T00:00:00+00:00')",
  )
  .await
  .unwrap();
  s.append(event("Red", "4", Action::TwoPoint)).await.unwrap();

  let all = s.scan(ScanOrder::All).await.unwrap();
  assert_eq!(ids(&all), vec![1, 3]);
}

#[tokio::test]
async fn events_survive_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("events.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.append(event("Red", "4", Action::ThreePoint)).await.unwrap();
  }

  let reopened = SqliteStore::open(&path).await.unwrap();
  let all = reopened.scan(ScanOrder::All).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].action, Action::ThreePoint);
}

#[tokio::test]
async fn locked_database_reports_busy() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("events.db");

  let s = SqliteStore::open_with(&path, StoreOptions {
    busy_timeout: Duration::from_millis(50),
  })
  .await
  .unwrap();

  let blocker = rusqlite::Connection::open(&path).unwrap();
  blocker.execute_batch("BEGIN EXCLUSIVE").unwrap();

  let err = s.append(event("Red", "4", Action::Foul)).await.unwrap_err();
  assert!(matches!(err, Error::Busy));
  assert!(err.is_busy());

  blocker.execute_batch("ROLLBACK").unwrap();
  assert!(s.append(event("Red", "4", Action::Foul)).await.is_ok());
}

// ─── Matches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_match_stores_winner_and_diff() {
  let s = store().await;
  let m = s.record_match(NewMatch::new("A", "B", 10, 7)).await.unwrap();

  assert_eq!(m.id, MatchId(1));
  assert_eq!(m.winner, MatchWinner::Team("A".into()));
  assert_eq!(m.point_diff, 3);

  let listed = s.list_matches().await.unwrap();
  assert_eq!(listed, vec![m]);
}

#[tokio::test]
async fn draw_round_trips_as_no_winner() {
  let s = store().await;
  s.record_match(NewMatch::new("B", "C", 5, 5)).await.unwrap();

  let listed = s.list_matches().await.unwrap();
  assert_eq!(listed[0].winner, MatchWinner::Draw);
  assert_eq!(listed[0].point_diff, 0);
}

#[tokio::test]
async fn self_match_is_rejected_without_writing() {
  let s = store().await;
  let err = s.record_match(NewMatch::new("A", "A", 3, 1)).await.unwrap_err();

  assert_eq!(
    err.validation(),
    Some(&courtside_core::Error::SameTeam("A".into()))
  );
  assert!(s.list_matches().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_matches_is_newest_first() {
  let s = store().await;
  s.record_match(NewMatch::new("A", "B", 10, 7)).await.unwrap();
  s.record_match(NewMatch::new("B", "C", 5, 5)).await.unwrap();
  s.record_match(NewMatch::new("A", "C", 3, 9)).await.unwrap();

  let order: Vec<_> = s.list_matches().await.unwrap().iter().map(|m| m.id.0).collect();
  assert_eq!(order, vec![3, 2, 1]);
}

#[tokio::test]
async fn delete_match_reports_whether_it_existed() {
  let s = store().await;
  let m = s.record_match(NewMatch::new("A", "B", 1, 0)).await.unwrap();

  assert!(s.delete_match(m.id).await.unwrap());
  assert!(!s.delete_match(m.id).await.unwrap());
  assert!(s.list_matches().await.unwrap().is_empty());
}

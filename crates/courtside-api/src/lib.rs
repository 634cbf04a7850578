//! JSON REST API for courtside.
//!
//! Exposes an axum [`Router`] backed by any [`EventStore`] and
//! [`MatchStore`]. Transport concerns (binding, tracing layers) are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", courtside_api::api_router(events, matches, scoreboard))
//! ```

pub mod error;
pub mod events;
pub mod league;
pub mod scores;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use courtside_core::{
  aggregate::Scoreboard,
  store::{EventStore, MatchStore},
};

pub use error::ApiError;

/// Shared state for the event-log routes.
pub struct EventState<E> {
  pub store:      Arc<E>,
  pub scoreboard: Arc<Scoreboard>,
}

impl<E> Clone for EventState<E> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), scoreboard: Arc::clone(&self.scoreboard) }
  }
}

/// Build the API router over an event store and a match store.
///
/// The two stores are independent; they may be the same value. The returned
/// `Router<()>` can be nested into any parent router regardless of its own
/// state type.
pub fn api_router<E, M>(
  event_store: Arc<E>,
  match_store: Arc<M>,
  scoreboard: Scoreboard,
) -> Router<()>
where
  E: EventStore + 'static,
  M: MatchStore + 'static,
{
  let event_routes = Router::new()
    .route("/events", get(events::list::<E>).post(events::create::<E>))
    .route("/events/delete", post(events::delete_many::<E>))
    .route("/events/wipe", post(events::wipe::<E>))
    .route("/events/{id}/undo", post(events::undo::<E>))
    .route("/score/live", get(scores::live::<E>))
    .route("/score/quarters", get(scores::quarters::<E>))
    .route("/tally", get(scores::tally::<E>))
    .route("/leaderboard", get(scores::leaders::<E>))
    .with_state(EventState { store: event_store, scoreboard: Arc::new(scoreboard) });

  let league_routes = Router::new()
    .route("/matches", get(league::list::<M>).post(league::create::<M>))
    .route("/matches/{id}", delete(league::delete_one::<M>))
    .route("/standings", get(league::standings::<M>))
    .route("/head-to-head", get(league::grid::<M>))
    .with_state(match_store);

  event_routes.merge(league_routes)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use courtside_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn router() -> Router {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    api_router(store.clone(), store, Scoreboard::new("Red", "Blue").unwrap())
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn event(team: &str, number: &str, action: &str, quarter: &str) -> Value {
    json!({
      "class": "beginner",
      "team": team,
      "bib_type": "home",
      "uniform_number": number,
      "player_name": format!("Player {number}"),
      "action": action,
      "quarter": quarter,
    })
  }

  // ── Events ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_event_returns_201_with_id() {
    let app = router().await;
    let (status, body) = send(&app, "POST", "/events", Some(event("Red", "4", "3pt", "Q1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["action"], "3pt");
  }

  #[tokio::test]
  async fn unknown_action_is_400() {
    let app = router().await;
    let (status, body) = send(&app, "POST", "/events", Some(event("Red", "4", "dunk", "Q1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("dunk"));

    let (_, events) = send(&app, "GET", "/events", None).await;
    assert_eq!(events, json!([]));
  }

  #[tokio::test]
  async fn recent_and_delete() {
    let app = router().await;
    for n in ["1", "2", "3"] {
      send(&app, "POST", "/events", Some(event("Red", n, "rebound", "Q2"))).await;
    }

    let (_, recent) = send(&app, "GET", "/events?recent=2", None).await;
    let ids: Vec<_> = recent.as_array().unwrap().iter().map(|e| e["id"].clone()).collect();
    assert_eq!(ids, vec![json!(2), json!(3)]);

    let (status, body) = send(&app, "POST", "/events/delete", Some(json!({ "ids": [1, 42] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "deleted": 1 }));

    let (_, body) = send(&app, "POST", "/events/3/undo", None).await;
    assert_eq!(body, json!({ "deleted": true }));
    let (_, body) = send(&app, "POST", "/events/3/undo", None).await;
    assert_eq!(body, json!({ "deleted": false }));
  }

  #[tokio::test]
  async fn body_missing_a_field_is_400_with_error_message() {
    let app = router().await;
    let mut body = event("Red", "4", "3pt", "Q1");
    body.as_object_mut().unwrap().remove("player_name");

    let (status, resp) = send(&app, "POST", "/events", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("player_name"), "{resp}");

    let (status, resp) =
      send(&app, "POST", "/matches", Some(json!({ "team_1": "A", "team_2": "B" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("score_1"), "{resp}");
  }

  #[tokio::test]
  async fn wipe_requires_exact_confirmation() {
    let app = router().await;
    send(&app, "POST", "/events", Some(event("Red", "4", "2pt", "Q1"))).await;

    let (status, _) = send(&app, "POST", "/events/wipe", Some(json!({ "confirm": "delete" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, events) = send(&app, "GET", "/events", None).await;
    assert_eq!(events.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "POST", "/events/wipe", Some(json!({ "confirm": "DELETE" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, events) = send(&app, "GET", "/events", None).await;
    assert_eq!(events, json!([]));
  }

  // ── Scores ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn live_score_lists_both_scoreboard_teams() {
    let app = router().await;
    let (_, score) = send(&app, "GET", "/score/live", None).await;
    assert_eq!(score, json!({ "Blue": 0, "Red": 0 }));

    send(&app, "POST", "/events", Some(event("Red", "4", "3pt", "Q1"))).await;
    send(&app, "POST", "/events", Some(event("Red", "4", "foul", "Q1"))).await;
    send(&app, "POST", "/events", Some(event("Blue", "9", "1pt", "Q2"))).await;

    let (_, score) = send(&app, "GET", "/score/live", None).await;
    assert_eq!(score, json!({ "Blue": 1, "Red": 3 }));
  }

  #[tokio::test]
  async fn tally_counts_fouls_by_team() {
    let app = router().await;
    send(&app, "POST", "/events", Some(event("Red", "4", "foul", "Q1"))).await;
    send(&app, "POST", "/events", Some(event("Red", "5", "foul", "Q3"))).await;
    send(&app, "POST", "/events", Some(event("Red", "5", "turnover", "Q3"))).await;

    let (status, rows) =
      send(&app, "GET", "/tally?category=infraction&action=foul&dims=team", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows, json!([{ "key": ["Red"], "value": 2 }]));

    let (status, _) = send(&app, "GET", "/tally?category=score&action=foul", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/tally?category=score&dims=height", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn leaderboard_rejects_zero_top() {
    let app = router().await;
    send(&app, "POST", "/events", Some(event("Red", "4", "3pt", "Q1"))).await;

    let (status, _) = send(&app, "GET", "/leaderboard?top=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rows) = send(&app, "GET", "/leaderboard?top=5&class=beginner&team=Red", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows[0]["points"], 3);
  }

  #[tokio::test]
  async fn quarter_pivot_totals_scoreboard_pair() {
    let app = router().await;
    send(&app, "POST", "/events", Some(event("Red", "4", "2pt", "Q1"))).await;
    send(&app, "POST", "/events", Some(event("Blue", "9", "3pt", "Q1"))).await;

    let (_, pivot) = send(&app, "GET", "/score/quarters", None).await;
    assert_eq!(pivot["teams"], json!(["Blue", "Red"]));
    assert_eq!(pivot["rows"][0]["quarter"], "Q1");
    assert_eq!(pivot["rows"][0]["total"], 5);
  }

  // ── League ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn record_match_and_standings() {
    let app = router().await;
    for (t1, t2, s1, s2) in [("A", "B", 10, 7), ("B", "C", 5, 5), ("A", "C", 3, 9)] {
      let (status, _) = send(
        &app,
        "POST",
        "/matches",
        Some(json!({ "team_1": t1, "team_2": t2, "score_1": s1, "score_2": s2 })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
    }

    let (_, table) = send(&app, "GET", "/standings", None).await;
    let order: Vec<_> = table.as_array().unwrap().iter().map(|r| r["team"].clone()).collect();
    assert_eq!(order, vec![json!("C"), json!("A"), json!("B")]);
    assert_eq!(table[0]["differential"], 6);

    let (_, grid) = send(&app, "GET", "/head-to-head", None).await;
    assert_eq!(grid["teams"], json!(["A", "B", "C"]));
    assert_eq!(grid["cells"][0][1], json!({ "kind": "played", "result": "win", "scoreline": "10-7" }));
    assert_eq!(grid["cells"][0][0], json!({ "kind": "no_match" }));
  }

  #[tokio::test]
  async fn invalid_matches_are_400_and_not_stored() {
    let app = router().await;
    let (status, _) = send(
      &app,
      "POST",
      "/matches",
      Some(json!({ "team_1": "A", "team_2": "A", "score_1": 5, "score_2": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
      &app,
      "POST",
      "/matches",
      Some(json!({ "team_1": "A", "team_2": "B", "score_1": -1, "score_2": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
      &app,
      "POST",
      "/matches",
      Some(json!({ "team_1": "A", "team_2": "B", "score_1": 5_000_000_000_i64, "score_2": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("out of range"), "{body}");

    let (_, matches) = send(&app, "GET", "/matches", None).await;
    assert_eq!(matches, json!([]));
  }

  #[tokio::test]
  async fn deleting_a_match_is_204_even_when_missing() {
    let app = router().await;
    let (_, created) = send(
      &app,
      "POST",
      "/matches",
      Some(json!({ "team_1": "A", "team_2": "B", "score_1": 1, "score_2": 0 })),
    )
    .await;
    let uri = format!("/matches/{}", created["id"]);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, table) = send(&app, "GET", "/standings", None).await;
    assert_eq!(table, json!([]));
  }
}

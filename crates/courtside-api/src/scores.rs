//! Read-only views derived from the event log.
//!
//! Each handler takes a fresh snapshot with [`EventStore::scan`] and hands it
//! to a pure function in [`courtside_core::aggregate`].

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Query, State},
};
use courtside_core::{
  aggregate::{
    Dimension, LeaderboardRow, LeaderboardScope, QuarterPivot, TallyFilter, TallyRow,
    TopN, group_tally, leaderboard, live_score, quarter_pivot,
  },
  event::{Action, Category, Event},
  store::{EventStore, ScanOrder},
};
use serde::Deserialize;

use crate::{EventState, error::ApiError};

async fn snapshot<E: EventStore>(store: &E) -> Result<Vec<Event>, ApiError> {
  store.scan(ScanOrder::All).await.map_err(ApiError::from_store)
}

/// `GET /score/live`: points per team, scoreboard teams always present.
pub async fn live<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
) -> Result<Json<BTreeMap<String, u32>>, ApiError> {
  let events = snapshot(state.store.as_ref()).await?;
  Ok(Json(live_score(&events, &state.scoreboard.teams())))
}

/// `GET /score/quarters`
pub async fn quarters<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
) -> Result<Json<QuarterPivot>, ApiError> {
  let events = snapshot(state.store.as_ref()).await?;
  Ok(Json(quarter_pivot(&events, &state.scoreboard)))
}

// ─── Tally ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TallyParams {
  /// `score`, `stat`, or `infraction`.
  pub category: String,
  /// Narrow to one action within the category, e.g. `foul`.
  pub action:   Option<String>,
  /// Comma-separated grouping dimensions, e.g. `class,team`.
  pub dims:     Option<String>,
}

/// `GET /tally?category=...[&action=...][&dims=...]`
pub async fn tally<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
  Query(params): Query<TallyParams>,
) -> Result<Json<Vec<TallyRow>>, ApiError> {
  let category = Category::parse(&params.category)?;
  let action = params.action.as_deref().map(Action::parse).transpose()?;
  let filter = TallyFilter::new(category, action)?;
  let dims = match params.dims.as_deref() {
    Some(list) => Dimension::parse_list(list)?,
    None => Vec::new(),
  };

  let events = snapshot(state.store.as_ref()).await?;
  Ok(Json(group_tally(&events, &dims, &filter)))
}

// ─── Leaderboard ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct LeaderboardParams {
  pub top:   Option<usize>,
  pub class: Option<String>,
  /// Only valid together with `class`.
  pub team:  Option<String>,
}

/// `GET /leaderboard[?top=N][&class=...][&team=...]`
pub async fn leaders<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
  let top_n = params.top.map(TopN::new).transpose()?.unwrap_or_default();
  let scope = match (params.class, params.team) {
    (Some(class), team) => LeaderboardScope::Class { class, team },
    (None, None) => LeaderboardScope::All,
    (None, Some(_)) => {
      return Err(ApiError::BadRequest("team filter requires a class".into()));
    }
  };

  let events = snapshot(state.store.as_ref()).await?;
  Ok(Json(leaderboard(&events, &scope, top_n)))
}

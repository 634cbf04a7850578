//! Handlers for league mode: `/matches`, `/standings`, `/head-to-head`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/matches` | Newest first |
//! | `POST`   | `/matches` | Body: [`NewMatchBody`]; returns 201 + stored match |
//! | `DELETE` | `/matches/{id}` | 204 whether or not the match existed |
//! | `GET`    | `/standings` | Recomputed from every match |
//! | `GET`    | `/head-to-head` | Grid over every team with a match |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use courtside_core::{
  league::{Match, MatchId, NewMatch, score_from_raw},
  standings::{HeadToHead, TeamRecord, compute_standings, head_to_head, teams_in},
  store::MatchStore,
};
use serde::Deserialize;

use crate::error::ApiError;

async fn all_matches<M: MatchStore>(store: &M) -> Result<Vec<Match>, ApiError> {
  store.list_matches().await.map_err(ApiError::from_store)
}

/// JSON body accepted by `POST /matches`. Scores are signed so a negative
/// value is reported as a validation error.
#[derive(Debug, Deserialize)]
pub struct NewMatchBody {
  pub team_1:  String,
  pub team_2:  String,
  pub score_1: i64,
  pub score_2: i64,
}

impl TryFrom<NewMatchBody> for NewMatch {
  type Error = courtside_core::Error;

  fn try_from(b: NewMatchBody) -> Result<Self, Self::Error> {
    Ok(NewMatch::new(
      b.team_1,
      b.team_2,
      score_from_raw(b.score_1)?,
      score_from_raw(b.score_2)?,
    ))
  }
}

/// `GET /matches`
pub async fn list<M: MatchStore + 'static>(
  State(store): State<Arc<M>>,
) -> Result<Json<Vec<Match>>, ApiError> {
  Ok(Json(all_matches(store.as_ref()).await?))
}

/// `POST /matches`
pub async fn create<M: MatchStore + 'static>(
  State(store): State<Arc<M>>,
  body: Result<Json<NewMatchBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let input = NewMatch::try_from(body)?;
  let recorded = store.record_match(input).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(recorded)))
}

/// `DELETE /matches/{id}`
pub async fn delete_one<M: MatchStore + 'static>(
  State(store): State<Arc<M>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store
    .delete_match(MatchId(id))
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /standings`
pub async fn standings<M: MatchStore + 'static>(
  State(store): State<Arc<M>>,
) -> Result<Json<Vec<TeamRecord>>, ApiError> {
  let matches = all_matches(store.as_ref()).await?;
  Ok(Json(compute_standings(&matches)))
}

/// `GET /head-to-head`
pub async fn grid<M: MatchStore + 'static>(
  State(store): State<Arc<M>>,
) -> Result<Json<HeadToHead>, ApiError> {
  let matches = all_matches(store.as_ref()).await?;
  Ok(Json(head_to_head(&matches, &teams_in(&matches))))
}

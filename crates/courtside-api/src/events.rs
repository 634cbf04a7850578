//! Handlers for `/events` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/events` | Optional `?recent=N`; always ascending by id |
//! | `POST` | `/events` | Body: [`NewEventBody`]; returns 201 + stored event |
//! | `POST` | `/events/delete` | Body: `{"ids":[..]}`; unknown ids are skipped |
//! | `POST` | `/events/{id}/undo` | Removes one event; `{"deleted":false}` if already gone |
//! | `POST` | `/events/wipe` | Body: `{"confirm":"DELETE"}`; anything else is rejected |

use std::collections::BTreeSet;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use courtside_core::{
  event::{Action, Event, EventId, NewEvent, Quarter},
  store::{EventStore, ScanOrder},
};
use serde::{Deserialize, Serialize};

use crate::{EventState, error::ApiError};

/// The literal a caller must send to wipe the event log.
pub const WIPE_CONFIRMATION: &str = "DELETE";

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Only the last `recent` events.
  pub recent: Option<usize>,
}

/// `GET /events[?recent=N]`
pub async fn list<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Event>>, ApiError> {
  let order = params.recent.map_or(ScanOrder::All, ScanOrder::Recent);
  let events = state.store.scan(order).await.map_err(ApiError::from_store)?;
  Ok(Json(events))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /events`.
///
/// Action and quarter arrive as plain labels so an unknown label is reported
/// as a validation error rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct NewEventBody {
  pub class:          String,
  pub team:           String,
  #[serde(default)]
  pub bib_type:       String,
  pub uniform_number: String,
  pub player_name:    String,
  pub action:         String,
  pub quarter:        String,
}

impl TryFrom<NewEventBody> for NewEvent {
  type Error = courtside_core::Error;

  fn try_from(b: NewEventBody) -> Result<Self, Self::Error> {
    Ok(NewEvent {
      action:         Action::parse(&b.action)?,
      quarter:        Quarter::parse(&b.quarter)?,
      class:          b.class,
      team:           b.team,
      bib_type:       b.bib_type,
      uniform_number: b.uniform_number,
      player_name:    b.player_name,
    })
  }
}

/// `POST /events`: returns 201 + the stored [`Event`].
pub async fn create<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
  body: Result<Json<NewEventBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let input = NewEvent::try_from(body)?;
  let event = state.store.append(input).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(event)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteBody {
  pub ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
  pub deleted: usize,
}

/// `POST /events/delete`
pub async fn delete_many<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
  body: Result<Json<DeleteBody>, JsonRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
  let Json(body) = body?;
  let ids: BTreeSet<EventId> = body.ids.into_iter().map(EventId).collect();
  let deleted = state.store.delete(&ids).await.map_err(ApiError::from_store)?;
  Ok(Json(DeleteResponse { deleted }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UndoResponse {
  pub deleted: bool,
}

/// `POST /events/{id}/undo`
pub async fn undo<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
  Path(id): Path<i64>,
) -> Result<Json<UndoResponse>, ApiError> {
  let deleted = state
    .store
    .delete_last(EventId(id))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(UndoResponse { deleted }))
}

// ─── Wipe ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WipeBody {
  #[serde(default)]
  pub confirm: String,
}

/// `POST /events/wipe`: 204 on success.
pub async fn wipe<E: EventStore + 'static>(
  State(state): State<EventState<E>>,
  body: Result<Json<WipeBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
  let Json(body) = body?;
  if body.confirm != WIPE_CONFIRMATION {
    return Err(ApiError::BadRequest(format!(
      "wipe requires \"confirm\": \"{WIPE_CONFIRMATION}\""
    )));
  }
  state.store.wipe_all().await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

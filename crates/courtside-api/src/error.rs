//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use courtside_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Seconds a client should wait before retrying after a 503.
const RETRY_AFTER_SECS: &str = "1";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store is busy; retry later")]
  Busy,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: validation failures are the caller's fault,
  /// lock timeouts are retryable, anything else is a server error.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    if let Some(invalid) = e.validation() {
      return Self::BadRequest(invalid.to_string());
    }
    if e.is_busy() {
      return Self::Busy;
    }
    Self::Store(Box::new(e))
  }
}

impl From<courtside_core::Error> for ApiError {
  fn from(e: courtside_core::Error) -> Self { Self::BadRequest(e.to_string()) }
}

/// A body that does not parse is a 400 like any other validation failure.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    match self {
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Busy => (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::RETRY_AFTER, RETRY_AFTER_SECS)],
        Json(json!({ "error": message })),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
          .into_response()
      }
    }
  }
}

//! Error types for `courtside-core`.
//!
//! Every variant is a validation failure: input that must be rejected at the
//! write boundary before it can enter a snapshot.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("unknown action label: {0:?}")]
  UnknownAction(String),

  #[error("unknown quarter: {0:?}")]
  UnknownQuarter(String),

  #[error("unknown tally dimension: {0:?}")]
  UnknownDimension(String),

  #[error("unknown action category: {0:?}")]
  UnknownCategory(String),

  #[error("required field is empty: {0}")]
  EmptyField(&'static str),

  #[error("action {action} is not in the {category} category")]
  ActionOutsideCategory { action: String, category: String },

  #[error("a team cannot play itself: {0:?}")]
  SameTeam(String),

  #[error("score must be non-negative, got {0}")]
  NegativeScore(i64),

  #[error("score is out of range: {0}")]
  ScoreOutOfRange(i64),

  #[error("top-N must be at least 1")]
  InvalidTopN,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

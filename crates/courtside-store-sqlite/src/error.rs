//! Error type for `courtside-store-sqlite`.

use courtside_core::store::StoreError;
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation error: {0}")]
  Core(#[from] courtside_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// SQLite stayed locked for longer than the configured busy timeout.
  #[error("database is busy; retry later")]
  Busy,

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored row could not be turned back into a domain value.
  #[error("corrupt row: {0}")]
  Decode(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, _)) = &e
      && matches!(code.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    {
      return Self::Busy;
    }
    Self::Database(e)
  }
}

impl StoreError for Error {
  fn validation(&self) -> Option<&courtside_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }

  fn is_busy(&self) -> bool { matches!(self, Self::Busy) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

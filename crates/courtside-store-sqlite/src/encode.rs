//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Actions and quarters use their
//! wire labels (`"3pt"`, `"Q1"`). A draw is stored as a NULL winner.

use chrono::{DateTime, Utc};
use courtside_core::{
  event::{Action, Event, EventId, Quarter},
  league::{Match, MatchId, MatchWinner},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Winner ──────────────────────────────────────────────────────────────────

pub fn encode_winner(w: &MatchWinner) -> Option<String> { w.team().map(str::to_owned) }

pub fn decode_winner(s: Option<String>) -> MatchWinner {
  s.map_or(MatchWinner::Draw, MatchWinner::Team)
}

fn decode_score(column: &str, raw: i64) -> Result<u32> {
  u32::try_from(raw).map_err(|_| Error::Decode(format!("{column} out of range: {raw}")))
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// An `events` row as read from SQLite, before label parsing.
pub struct RawEvent {
  pub id:             i64,
  pub class:          String,
  pub team:           String,
  pub bib_type:       String,
  pub uniform_number: String,
  pub player_name:    String,
  pub action:         String,
  pub quarter:        String,
  pub created_at:     String,
}

impl RawEvent {
  pub const COLUMNS: &'static str = "id, class, team, bib_type, uniform_number, \
                                     player_name, action, quarter, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      class:          row.get(1)?,
      team:           row.get(2)?,
      bib_type:       row.get(3)?,
      uniform_number: row.get(4)?,
      player_name:    row.get(5)?,
      action:         row.get(6)?,
      quarter:        row.get(7)?,
      created_at:     row.get(8)?,
    })
  }

  /// Unknown action or quarter labels surface as [`Error::Core`].
  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:             EventId(self.id),
      action:         Action::parse(&self.action)?,
      quarter:        Quarter::parse(&self.quarter)?,
      created_at:     decode_dt(&self.created_at)?,
      class:          self.class,
      team:           self.team,
      bib_type:       self.bib_type,
      uniform_number: self.uniform_number,
      player_name:    self.player_name,
    })
  }
}

/// A `league_matches` row as read from SQLite.
pub struct RawMatch {
  pub id:         i64,
  pub team_1:     String,
  pub team_2:     String,
  pub score_1:    i64,
  pub score_2:    i64,
  pub winner:     Option<String>,
  pub point_diff: i64,
  pub created_at: String,
}

impl RawMatch {
  pub const COLUMNS: &'static str =
    "id, team_1, team_2, score_1, score_2, winner, point_diff, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      team_1:     row.get(1)?,
      team_2:     row.get(2)?,
      score_1:    row.get(3)?,
      score_2:    row.get(4)?,
      winner:     row.get(5)?,
      point_diff: row.get(6)?,
      created_at: row.get(7)?,
    })
  }

  pub fn into_match(self) -> Result<Match> {
    Ok(Match {
      id:         MatchId(self.id),
      score_1:    decode_score("score_1", self.score_1)?,
      score_2:    decode_score("score_2", self.score_2)?,
      point_diff: decode_score("point_diff", self.point_diff)?,
      winner:     decode_winner(self.winner),
      created_at: decode_dt(&self.created_at)?,
      team_1:     self.team_1,
      team_2:     self.team_2,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn winner_null_is_draw() {
    assert_eq!(decode_winner(None), MatchWinner::Draw);
    assert_eq!(encode_winner(&MatchWinner::Draw), None);
    assert_eq!(
      decode_winner(encode_winner(&MatchWinner::Team("A".into()))),
      MatchWinner::Team("A".into())
    );
  }

  #[test]
  fn bad_timestamp_is_a_date_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn unknown_action_is_a_core_error() {
    let raw = RawEvent {
      id:             1,
      class:          "beginner".into(),
      team:           "Red".into(),
      bib_type:       String::new(),
      uniform_number: "4".into(),
      player_name:    "Sato".into(),
      action:         "dunk".into(),
      quarter:        "Q1".into(),
      created_at:     encode_dt(Utc::now()),
    };
    assert!(matches!(
      raw.into_event(),
      Err(Error::Core(courtside_core::Error::UnknownAction(a))) if a == "dunk"
    ));
  }
}

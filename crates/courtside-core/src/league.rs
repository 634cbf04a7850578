//! League match types.
//!
//! A match is a two-team result. The winner and point difference are computed
//! once when the match is recorded and stored alongside the raw scores;
//! matches are never edited, only deleted and re-entered.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned primary key for a match.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MatchId(pub i64);

impl fmt::Display for MatchId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Who won a match. Serialises as the team name, or `null` for a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchWinner {
  Team(String),
  Draw,
}

impl MatchWinner {
  pub fn team(&self) -> Option<&str> {
    match self {
      Self::Team(t) => Some(t),
      Self::Draw => None,
    }
  }
}

impl fmt::Display for MatchWinner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Team(t) => f.write_str(t),
      Self::Draw => f.write_str("draw"),
    }
  }
}

/// A persisted match result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
  pub id:         MatchId,
  pub team_1:     String,
  pub team_2:     String,
  pub score_1:    u32,
  pub score_2:    u32,
  /// Snapshot taken at write time.
  pub winner:     MatchWinner,
  /// `|score_1 - score_2|`, snapshot taken at write time.
  pub point_diff: u32,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MatchStore::record_match`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatch {
  pub team_1:  String,
  pub team_2:  String,
  pub score_1: u32,
  pub score_2: u32,
}

impl NewMatch {
  pub fn new(
    team_1: impl Into<String>,
    team_2: impl Into<String>,
    score_1: u32,
    score_2: u32,
  ) -> Self {
    Self { team_1: team_1.into(), team_2: team_2.into(), score_1, score_2 }
  }

  /// Reject blank team names and self-matches.
  pub fn validate(&self) -> Result<()> {
    if self.team_1.trim().is_empty() {
      return Err(Error::EmptyField("team_1"));
    }
    if self.team_2.trim().is_empty() {
      return Err(Error::EmptyField("team_2"));
    }
    if self.team_1 == self.team_2 {
      return Err(Error::SameTeam(self.team_1.clone()));
    }
    Ok(())
  }

  /// The derived `(winner, point_diff)` pair stored with the match.
  pub fn outcome(&self) -> (MatchWinner, u32) {
    let winner = match self.score_1.cmp(&self.score_2) {
      std::cmp::Ordering::Greater => MatchWinner::Team(self.team_1.clone()),
      std::cmp::Ordering::Less => MatchWinner::Team(self.team_2.clone()),
      std::cmp::Ordering::Equal => MatchWinner::Draw,
    };
    (winner, self.score_1.abs_diff(self.score_2))
  }
}

/// Convert a caller-supplied score, rejecting negatives and values past
/// `u32::MAX`.
pub fn score_from_raw(raw: i64) -> Result<u32> {
  if raw < 0 {
    return Err(Error::NegativeScore(raw));
  }
  u32::try_from(raw).map_err(|_| Error::ScoreOutOfRange(raw))
}

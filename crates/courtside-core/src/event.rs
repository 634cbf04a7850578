//! Event types: one recorded play on the court.
//!
//! An event is an immutable fact: it is appended once, may later be deleted,
//! and is never updated in place. The player labels are copied from the
//! roster at entry time and are not re-resolved afterwards.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Store-assigned primary key. Strictly increasing within one store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Categories ──────────────────────────────────────────────────────────────

/// The three disjoint groups every action belongs to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
  /// Carries a point value.
  Score,
  /// Counted, never scored.
  Stat,
  /// Fouls and turnovers.
  Infraction,
}

impl Category {
  /// Parse a category label, mapping failures to a validation error.
  pub fn parse(label: &str) -> Result<Self> {
    Self::from_str(label).map_err(|_| Error::UnknownCategory(label.to_owned()))
  }
}

// ─── Action ──────────────────────────────────────────────────────────────────

/// The closed set of plays that can be recorded.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
  #[serde(rename = "3pt")]
  #[strum(serialize = "3pt")]
  ThreePoint,
  #[serde(rename = "2pt")]
  #[strum(serialize = "2pt")]
  TwoPoint,
  #[serde(rename = "1pt")]
  #[strum(serialize = "1pt")]
  OnePoint,
  Assist,
  Block,
  Rebound,
  Steal,
  Foul,
  Turnover,
}

impl Action {
  /// The category partition and point values. Every aggregation reads from
  /// here; nothing else branches on individual labels.
  const fn classify(self) -> (Category, u32) {
    match self {
      Self::ThreePoint => (Category::Score, 3),
      Self::TwoPoint => (Category::Score, 2),
      Self::OnePoint => (Category::Score, 1),
      Self::Assist | Self::Block | Self::Rebound | Self::Steal => {
        (Category::Stat, 0)
      }
      Self::Foul | Self::Turnover => (Category::Infraction, 0),
    }
  }

  pub const fn category(self) -> Category { self.classify().0 }

  /// Points awarded by this action; zero outside [`Category::Score`].
  pub const fn points(self) -> u32 { self.classify().1 }

  /// The label stored in the `action` column.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a stored or user-supplied label.
  pub fn parse(label: &str) -> Result<Self> {
    Self::from_str(label).map_err(|_| Error::UnknownAction(label.to_owned()))
  }
}

// ─── Quarter ─────────────────────────────────────────────────────────────────

/// Game period. Ordering follows play order, so `OT` sorts last.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum Quarter {
  Q1,
  Q2,
  Q3,
  Q4,
  OT,
}

impl Quarter {
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(label: &str) -> Result<Self> {
    Self::from_str(label).map_err(|_| Error::UnknownQuarter(label.to_owned()))
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A persisted play. Once written, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub id:             EventId,
  pub class:          String,
  pub team:           String,
  pub bib_type:       String,
  pub uniform_number: String,
  pub player_name:    String,
  pub action:         Action,
  pub quarter:        Quarter,
  /// Server-assigned; display only. Ordering is always by `id`.
  pub created_at:     DateTime<Utc>,
}

impl Event {
  pub fn points(&self) -> u32 { self.action.points() }
}

// ─── NewEvent ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::EventStore::append`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
  pub class:          String,
  pub team:           String,
  #[serde(default)]
  pub bib_type:       String,
  pub uniform_number: String,
  pub player_name:    String,
  pub action:         Action,
  pub quarter:        Quarter,
}

impl NewEvent {
  /// Reject events with blank identifying labels. The bib type may be blank;
  /// not every roster assigns one.
  pub fn validate(&self) -> Result<()> {
    let required = [
      ("class", &self.class),
      ("team", &self.team),
      ("uniform_number", &self.uniform_number),
      ("player_name", &self.player_name),
    ];
    for (field, value) in required {
      if value.trim().is_empty() {
        return Err(Error::EmptyField(field));
      }
    }
    Ok(())
  }
}

//! Derived views over a snapshot of events.
//!
//! Every function here is pure: it borrows the snapshot, never mutates it,
//! and returns an owned view. The same snapshot always yields the same view,
//! and an empty snapshot yields an empty view rather than an error.

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt,
  num::NonZeroUsize,
  str::FromStr,
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Error, Result,
  event::{Action, Category, Event, Quarter},
};

// ─── Scoreboard ──────────────────────────────────────────────────────────────

/// The two teams shown on the live scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
  pub home: String,
  pub away: String,
}

impl Scoreboard {
  pub fn new(home: impl Into<String>, away: impl Into<String>) -> Result<Self> {
    let (home, away) = (home.into(), away.into());
    if home.trim().is_empty() {
      return Err(Error::EmptyField("home"));
    }
    if away.trim().is_empty() {
      return Err(Error::EmptyField("away"));
    }
    if home == away {
      return Err(Error::SameTeam(home));
    }
    Ok(Self { home, away })
  }

  pub fn teams(&self) -> [String; 2] { [self.home.clone(), self.away.clone()] }
}

impl Default for Scoreboard {
  fn default() -> Self {
    Self { home: "Red".to_owned(), away: "Blue".to_owned() }
  }
}

// ─── Live score ──────────────────────────────────────────────────────────────

/// Points per team.
///
/// Every team listed in `teams`, and every team that appears anywhere in the
/// snapshot, gets an entry; teams without score actions report 0. With no
/// events and no `teams` the map is empty.
pub fn live_score(events: &[Event], teams: &[String]) -> BTreeMap<String, u32> {
  let mut score: BTreeMap<String, u32> =
    teams.iter().map(|t| (t.clone(), 0)).collect();
  for event in events {
    *score.entry(event.team.clone()).or_insert(0) += event.points();
  }
  score
}

// ─── Group tally ─────────────────────────────────────────────────────────────

/// A column an event can be grouped by.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
  Class,
  Team,
  BibType,
  UniformNumber,
  PlayerName,
  Action,
  Quarter,
}

impl Dimension {
  pub fn parse(label: &str) -> Result<Self> {
    Self::from_str(label.trim())
      .map_err(|_| Error::UnknownDimension(label.to_owned()))
  }

  /// Parse a comma-separated list such as `class,team,player_name`.
  pub fn parse_list(labels: &str) -> Result<Vec<Self>> {
    labels
      .split(',')
      .filter(|l| !l.trim().is_empty())
      .map(Self::parse)
      .collect()
  }

  fn key(self, event: &Event) -> KeyPart {
    match self {
      Self::Class => KeyPart::Label(event.class.clone()),
      Self::Team => KeyPart::Label(event.team.clone()),
      Self::BibType => KeyPart::Label(event.bib_type.clone()),
      Self::UniformNumber => KeyPart::Label(event.uniform_number.clone()),
      Self::PlayerName => KeyPart::Label(event.player_name.clone()),
      Self::Action => KeyPart::Action(event.action),
      Self::Quarter => KeyPart::Quarter(event.quarter),
    }
  }
}

/// One component of a grouping key. Quarters and actions keep their own
/// ordering rather than sorting as text.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(untagged)]
pub enum KeyPart {
  Action(Action),
  Quarter(Quarter),
  Label(String),
}

impl fmt::Display for KeyPart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Action(a) => write!(f, "{a}"),
      Self::Quarter(q) => write!(f, "{q}"),
      Self::Label(l) => f.write_str(l),
    }
  }
}

/// Selects which events a tally considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyFilter {
  pub category: Category,
  /// Narrow the category to a single action, e.g. fouls only.
  pub action:   Option<Action>,
}

impl TallyFilter {
  pub fn new(category: Category, action: Option<Action>) -> Result<Self> {
    if let Some(a) = action
      && a.category() != category
    {
      return Err(Error::ActionOutsideCategory {
        action:   a.to_string(),
        category: category.to_string(),
      });
    }
    Ok(Self { category, action })
  }

  pub fn category(category: Category) -> Self { Self { category, action: None } }

  pub fn action(action: Action) -> Self {
    Self { category: action.category(), action: Some(action) }
  }

  fn admits(&self, event: &Event) -> bool {
    event.action.category() == self.category
      && self.action.is_none_or(|a| a == event.action)
  }
}

/// One output row of [`group_tally`]. `key` follows the order of the
/// requested dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyRow {
  pub key:   Vec<KeyPart>,
  /// Summed points for score tallies, event count otherwise.
  pub value: u32,
}

/// Group the events admitted by `filter` by `dims`.
///
/// Rows come back ordered by key. With no dimensions the result is a single
/// grand-total row, or nothing if no event matched.
pub fn group_tally(
  events: &[Event],
  dims: &[Dimension],
  filter: &TallyFilter,
) -> Vec<TallyRow> {
  let mut groups: BTreeMap<Vec<KeyPart>, u32> = BTreeMap::new();
  for event in events.iter().filter(|e| filter.admits(e)) {
    let key = dims.iter().map(|d| d.key(event)).collect();
    let weight = match filter.category {
      Category::Score => event.points(),
      Category::Stat | Category::Infraction => 1,
    };
    *groups.entry(key).or_default() += weight;
  }
  groups
    .into_iter()
    .map(|(key, value)| TallyRow { key, value })
    .collect()
}

// ─── Quarter pivot ───────────────────────────────────────────────────────────

/// Points per team for one (class, quarter) cell row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRow {
  pub class:   String,
  pub quarter: Quarter,
  /// One entry per pivot column; 0 where the team did not score.
  pub points:  BTreeMap<String, u32>,
  /// Home + away. Absent unless both scoreboard teams are columns.
  pub total:   Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterPivot {
  /// Teams that recorded at least one score action, ascending.
  pub teams: Vec<String>,
  pub rows:  Vec<PivotRow>,
}

/// Cross-tabulate (class, quarter) against team, summing points.
pub fn quarter_pivot(events: &[Event], scoreboard: &Scoreboard) -> QuarterPivot {
  let mut teams: BTreeSet<String> = BTreeSet::new();
  let mut cells: BTreeMap<(String, Quarter), BTreeMap<String, u32>> =
    BTreeMap::new();

  for event in events.iter().filter(|e| e.action.category() == Category::Score) {
    teams.insert(event.team.clone());
    *cells
      .entry((event.class.clone(), event.quarter))
      .or_default()
      .entry(event.team.clone())
      .or_default() += event.points();
  }

  let has_pair = teams.contains(&scoreboard.home) && teams.contains(&scoreboard.away);

  let rows = cells
    .into_iter()
    .map(|((class, quarter), mut points)| {
      for team in &teams {
        points.entry(team.clone()).or_insert(0);
      }
      let total = has_pair.then(|| {
        points.get(&scoreboard.home).copied().unwrap_or(0)
          + points.get(&scoreboard.away).copied().unwrap_or(0)
      });
      PivotRow { class, quarter, points, total }
    })
    .collect();

  QuarterPivot { teams: teams.into_iter().collect(), rows }
}

// ─── Leaderboard ─────────────────────────────────────────────────────────────

/// Which events a leaderboard ranks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum LeaderboardScope {
  #[default]
  All,
  /// One class, optionally narrowed to one team.
  Class { class: String, team: Option<String> },
}

impl LeaderboardScope {
  fn includes(&self, event: &Event) -> bool {
    match self {
      Self::All => true,
      Self::Class { class, team } => {
        event.class == *class && team.as_ref().is_none_or(|t| event.team == *t)
      }
    }
  }
}

/// How many leaderboard rows to keep. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopN(NonZeroUsize);

impl TopN {
  pub fn new(n: usize) -> Result<Self> {
    NonZeroUsize::new(n).map(Self).ok_or(Error::InvalidTopN)
  }

  pub fn get(self) -> usize { self.0.get() }
}

impl Default for TopN {
  fn default() -> Self { Self(NonZeroUsize::MIN.saturating_add(9)) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
  pub class:          String,
  pub team:           String,
  pub bib_type:       String,
  pub uniform_number: String,
  pub player_name:    String,
  pub points:         u32,
}

/// Rank players by summed points.
///
/// Sort key: points descending, then class, team, and uniform number
/// ascending. Groups are accumulated in key order and the sort is stable, so
/// rows tied on the whole sort key keep that order.
pub fn leaderboard(
  events: &[Event],
  scope: &LeaderboardScope,
  top_n: TopN,
) -> Vec<LeaderboardRow> {
  type PlayerKey = (String, String, String, String, String);
  let mut groups: BTreeMap<PlayerKey, u32> = BTreeMap::new();

  for event in events
    .iter()
    .filter(|e| e.action.category() == Category::Score && scope.includes(e))
  {
    let key = (
      event.class.clone(),
      event.team.clone(),
      event.bib_type.clone(),
      event.uniform_number.clone(),
      event.player_name.clone(),
    );
    *groups.entry(key).or_default() += event.points();
  }

  let mut rows: Vec<LeaderboardRow> = groups
    .into_iter()
    .map(
      |((class, team, bib_type, uniform_number, player_name), points)| {
        LeaderboardRow { class, team, bib_type, uniform_number, player_name, points }
      },
    )
    .collect();

  rows.sort_by(|a, b| {
    b.points
      .cmp(&a.points)
      .then_with(|| a.class.cmp(&b.class))
      .then_with(|| a.team.cmp(&b.team))
      .then_with(|| a.uniform_number.cmp(&b.uniform_number))
  });
  rows.truncate(top_n.get());
  rows
}

//! Round-robin standings and the head-to-head grid.
//!
//! Both views are recomputed from the full match set on every read; nothing
//! here is persisted.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::league::Match;

// ─── Standings ───────────────────────────────────────────────────────────────

/// One standings row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
  /// 1-based position after sorting; not a property of the team.
  pub rank:           usize,
  pub team:           String,
  pub played:         u32,
  pub wins:           u32,
  pub losses:         u32,
  pub draws:          u32,
  pub points_for:     u64,
  pub points_against: u64,
  pub differential:   i64,
}

#[derive(Default)]
struct Accumulator {
  played:         u32,
  wins:           u32,
  losses:         u32,
  draws:          u32,
  points_for:     u64,
  points_against: u64,
}

impl Accumulator {
  fn record(&mut self, scored: u32, conceded: u32) {
    self.played += 1;
    self.points_for += u64::from(scored);
    self.points_against += u64::from(conceded);
    match scored.cmp(&conceded) {
      std::cmp::Ordering::Greater => self.wins += 1,
      std::cmp::Ordering::Less => self.losses += 1,
      std::cmp::Ordering::Equal => self.draws += 1,
    }
  }
}

/// Build the standings table.
///
/// Ordered by wins descending, then point differential descending, then team
/// name ascending. Teams without a match do not appear.
pub fn compute_standings(matches: &[Match]) -> Vec<TeamRecord> {
  let mut table: BTreeMap<&str, Accumulator> = BTreeMap::new();
  for m in matches {
    table.entry(m.team_1.as_str()).or_default().record(m.score_1, m.score_2);
    table.entry(m.team_2.as_str()).or_default().record(m.score_2, m.score_1);
  }

  let mut records: Vec<TeamRecord> = table
    .into_iter()
    .map(|(team, acc)| TeamRecord {
      rank:           0,
      team:           team.to_owned(),
      played:         acc.played,
      wins:           acc.wins,
      losses:         acc.losses,
      draws:          acc.draws,
      points_for:     acc.points_for,
      points_against: acc.points_against,
      differential:   acc.points_for as i64 - acc.points_against as i64,
    })
    .collect();

  records.sort_by(|a, b| {
    b.wins
      .cmp(&a.wins)
      .then_with(|| b.differential.cmp(&a.differential))
      .then_with(|| a.team.cmp(&b.team))
  });
  for (i, record) in records.iter_mut().enumerate() {
    record.rank = i + 1;
  }
  records
}

// ─── Head-to-head ────────────────────────────────────────────────────────────

/// A result seen from one side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
  Win,
  Loss,
  Draw,
}

impl MatchResult {
  fn from_scores(own: u32, other: u32) -> Self {
    match own.cmp(&other) {
      std::cmp::Ordering::Greater => Self::Win,
      std::cmp::Ordering::Less => Self::Loss,
      std::cmp::Ordering::Equal => Self::Draw,
    }
  }

  pub fn symbol(self) -> &'static str {
    match self {
      Self::Win => "○",
      Self::Loss => "●",
      Self::Draw => "△",
    }
  }
}

/// One cell of the head-to-head grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
  /// The pair has not played (or the cell is on the diagonal).
  NoMatch,
  Played {
    result:    MatchResult,
    /// Row team's score first, e.g. `"10-7"`.
    scoreline: String,
  },
}

impl Cell {
  pub fn symbol(&self) -> &'static str {
    match self {
      Self::NoMatch => "-",
      Self::Played { result, .. } => result.symbol(),
    }
  }
}

/// Square grid indexed by `teams` on both axes: `cells[row][col]` is the
/// result for `teams[row]` against `teams[col]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
  pub teams: Vec<String>,
  pub cells: Vec<Vec<Cell>>,
}

impl HeadToHead {
  pub fn cell(&self, row: &str, col: &str) -> Option<&Cell> {
    let r = self.teams.iter().position(|t| t == row)?;
    let c = self.teams.iter().position(|t| t == col)?;
    Some(&self.cells[r][c])
  }
}

/// Every team that appears in `matches`, ascending.
pub fn teams_in(matches: &[Match]) -> Vec<String> {
  matches
    .iter()
    .flat_map(|m| [m.team_1.clone(), m.team_2.clone()])
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

/// Build the head-to-head grid over `teams`.
///
/// Both directed cells of a match are written together. Matches are applied
/// in id order, so if a pair met more than once the latest match is shown.
/// Matches involving a team outside `teams` are ignored.
pub fn head_to_head(matches: &[Match], teams: &[String]) -> HeadToHead {
  let index: BTreeMap<&str, usize> =
    teams.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();
  let mut cells = vec![vec![Cell::NoMatch; teams.len()]; teams.len()];

  let mut ordered: Vec<&Match> = matches.iter().collect();
  ordered.sort_by_key(|m| m.id);

  for m in ordered {
    let (Some(&a), Some(&b)) =
      (index.get(m.team_1.as_str()), index.get(m.team_2.as_str()))
    else {
      continue;
    };
    cells[a][b] = Cell::Played {
      result:    MatchResult::from_scores(m.score_1, m.score_2),
      scoreline: format!("{}-{}", m.score_1, m.score_2),
    };
    cells[b][a] = Cell::Played {
      result:    MatchResult::from_scores(m.score_2, m.score_1),
      scoreline: format!("{}-{}", m.score_2, m.score_1),
    };
  }

  HeadToHead { teams: teams.to_vec(), cells }
}

//! Plain-text rendering of API responses.
//!
//! Every function returns the full text block; `main` prints it.

use std::{collections::BTreeMap, fmt::Write as _};

use courtside_core::{
  aggregate::{LeaderboardRow, QuarterPivot, TallyRow},
  event::Event,
  league::Match,
  roster::RosterEntry,
  standings::{Cell, HeadToHead, TeamRecord},
};

const EMPTY: &str = "(none)\n";

pub fn events(events: &[Event]) -> String {
  if events.is_empty() {
    return EMPTY.to_owned();
  }
  let mut out = String::new();
  for e in events {
    let _ = writeln!(
      out,
      "{:>5}  {}  {:<2}  {:<12} {:<10} #{:<3} {:<16} {}",
      e.id.0,
      e.created_at.format("%H:%M:%S"),
      e.quarter.as_str(),
      e.class,
      e.team,
      e.uniform_number,
      e.player_name,
      e.action.as_str(),
    );
  }
  out
}

pub fn players(players: &[RosterEntry]) -> String {
  if players.is_empty() {
    return EMPTY.to_owned();
  }
  players.iter().map(|p| format!("{}\n", p.display())).collect()
}

pub fn live_score(score: &BTreeMap<String, u32>) -> String {
  if score.is_empty() {
    return EMPTY.to_owned();
  }
  let width = score.keys().map(String::len).max().unwrap_or(0);
  score
    .iter()
    .map(|(team, points)| format!("{team:<width$}  {points:>4}\n"))
    .collect()
}

pub fn tally(rows: &[TallyRow]) -> String {
  if rows.is_empty() {
    return EMPTY.to_owned();
  }
  let labels: Vec<String> = rows
    .iter()
    .map(|r| {
      let parts: Vec<String> = r.key.iter().map(ToString::to_string).collect();
      if parts.is_empty() { "total".to_owned() } else { parts.join(" / ") }
    })
    .collect();
  let width = labels.iter().map(String::len).max().unwrap_or(0);
  labels
    .iter()
    .zip(rows)
    .map(|(label, row)| format!("{label:<width$}  {:>4}\n", row.value))
    .collect()
}

pub fn quarter_pivot(pivot: &QuarterPivot) -> String {
  if pivot.rows.is_empty() {
    return EMPTY.to_owned();
  }
  let with_total = pivot.rows.iter().any(|r| r.total.is_some());

  let mut out = format!("{:<12} {:<3}", "class", "qtr");
  for team in &pivot.teams {
    let _ = write!(out, " {team:>8}");
  }
  if with_total {
    let _ = write!(out, " {:>8}", "total");
  }
  out.push('\n');

  for row in &pivot.rows {
    let _ = write!(out, "{:<12} {:<3}", row.class, row.quarter.as_str());
    for team in &pivot.teams {
      let _ = write!(out, " {:>8}", row.points.get(team).copied().unwrap_or(0));
    }
    if let Some(total) = row.total {
      let _ = write!(out, " {total:>8}");
    }
    out.push('\n');
  }
  out
}

pub fn leaderboard(rows: &[LeaderboardRow]) -> String {
  if rows.is_empty() {
    return EMPTY.to_owned();
  }
  let mut out = String::new();
  for (i, r) in rows.iter().enumerate() {
    let _ = writeln!(
      out,
      "{:>3}. {:<12} {:<10} #{:<3} {:<16} {:<6} {:>4}",
      i + 1,
      r.class,
      r.team,
      r.uniform_number,
      r.player_name,
      r.bib_type,
      r.points,
    );
  }
  out
}

pub fn matches(matches: &[Match]) -> String {
  if matches.is_empty() {
    return EMPTY.to_owned();
  }
  let mut out = String::new();
  for m in matches {
    let _ = writeln!(
      out,
      "{:>4}  {} {} - {} {}  ({}, +{})",
      m.id.0, m.team_1, m.score_1, m.score_2, m.team_2, m.winner, m.point_diff,
    );
  }
  out
}

pub fn standings(table: &[TeamRecord]) -> String {
  if table.is_empty() {
    return EMPTY.to_owned();
  }
  let width = table.iter().map(|r| r.team.len()).max().unwrap_or(0).max(4);
  let mut out = format!(
    "{:>4}  {:<width$}  {:>2} {:>2} {:>2} {:>2} {:>4} {:>4} {:>5}\n",
    "rank", "team", "P", "W", "L", "D", "PF", "PA", "diff"
  );
  for r in table {
    let _ = writeln!(
      out,
      "{:>4}  {:<width$}  {:>2} {:>2} {:>2} {:>2} {:>4} {:>4} {:>+5}",
      r.rank,
      r.team,
      r.played,
      r.wins,
      r.losses,
      r.draws,
      r.points_for,
      r.points_against,
      r.differential,
    );
  }
  out
}

fn cell_text(cell: &Cell) -> String {
  match cell {
    Cell::NoMatch => cell.symbol().to_owned(),
    Cell::Played { scoreline, .. } => format!("{} {scoreline}", cell.symbol()),
  }
}

pub fn head_to_head(grid: &HeadToHead) -> String {
  if grid.teams.is_empty() {
    return EMPTY.to_owned();
  }
  let name_width = grid.teams.iter().map(String::len).max().unwrap_or(0);
  let texts: Vec<Vec<String>> =
    grid.cells.iter().map(|row| row.iter().map(cell_text).collect()).collect();
  let col_width = texts
    .iter()
    .flatten()
    .map(|t| t.chars().count())
    .chain(grid.teams.iter().map(|t| t.chars().count()))
    .max()
    .unwrap_or(0);

  let mut out = format!("{:name_width$}", "");
  for team in &grid.teams {
    let _ = write!(out, "  {team:^col_width$}");
  }
  out.push('\n');
  for (team, row) in grid.teams.iter().zip(&texts) {
    let _ = write!(out, "{team:<name_width$}");
    for text in row {
      let _ = write!(out, "  {text:^col_width$}");
    }
    out.push('\n');
  }
  out
}

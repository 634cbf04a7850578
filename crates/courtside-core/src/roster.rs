//! Roster lookup: resolves a (class, team) pair to the players a caller may
//! pick from before recording an event.
//!
//! The core never calls this itself. Callers use it to fill the player labels
//! of a [`NewEvent`]; once recorded, an event keeps those labels even if the
//! roster later changes.

use serde::{Deserialize, Serialize};

use crate::event::{Action, NewEvent, Quarter};

/// One player as listed in a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
  pub class:          String,
  pub team:           String,
  pub uniform_number: String,
  pub player_name:    String,
  #[serde(default)]
  pub bib_type:       String,
}

impl RosterEntry {
  /// Picker label, e.g. `"7 - Sato - home"`.
  pub fn display(&self) -> String {
    format!("{} - {} - {}", self.uniform_number, self.player_name, self.bib_type)
  }

  /// Copy this player's labels into a new event.
  pub fn to_new_event(&self, action: Action, quarter: Quarter) -> NewEvent {
    NewEvent {
      class: self.class.clone(),
      team: self.team.clone(),
      bib_type: self.bib_type.clone(),
      uniform_number: self.uniform_number.clone(),
      player_name: self.player_name.clone(),
      action,
      quarter,
    }
  }
}

/// Source of eligible players.
pub trait RosterLookup {
  /// Players eligible for `class` and `team`, in roster order.
  fn players(&self, class: &str, team: &str) -> Vec<RosterEntry>;

  /// The player wearing `uniform_number` in `class` and `team`.
  fn find(&self, class: &str, team: &str, uniform_number: &str) -> Option<RosterEntry> {
    self
      .players(class, team)
      .into_iter()
      .find(|p| p.uniform_number == uniform_number)
  }
}

/// A roster held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryRoster {
  #[serde(default, rename = "player")]
  pub entries: Vec<RosterEntry>,
}

impl InMemoryRoster {
  pub fn new(entries: Vec<RosterEntry>) -> Self { Self { entries } }
}

impl RosterLookup for InMemoryRoster {
  fn players(&self, class: &str, team: &str) -> Vec<RosterEntry> {
    self
      .entries
      .iter()
      .filter(|p| p.class == class && p.team == team)
      .cloned()
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(class: &str, team: &str, number: &str, name: &str) -> RosterEntry {
    RosterEntry {
      class:          class.into(),
      team:           team.into(),
      uniform_number: number.into(),
      player_name:    name.into(),
      bib_type:       "home".into(),
    }
  }

  fn roster() -> InMemoryRoster {
    InMemoryRoster::new(vec![
      entry("beginner", "Red", "4", "Sato"),
      entry("beginner", "Blue", "9", "Ito"),
      entry("beginner", "Red", "12", "Kato"),
      entry("advanced", "Red", "4", "Mori"),
    ])
  }

  #[test]
  fn players_filters_by_class_and_team_in_roster_order() {
    let names: Vec<_> = roster()
      .players("beginner", "Red")
      .into_iter()
      .map(|p| p.player_name)
      .collect();
    assert_eq!(names, vec!["Sato", "Kato"]);
    assert!(roster().players("intermediate", "Red").is_empty());
  }

  #[test]
  fn find_resolves_number_within_class_and_team() {
    let found = roster().find("advanced", "Red", "4").unwrap();
    assert_eq!(found.player_name, "Mori");
    assert!(roster().find("beginner", "Blue", "4").is_none());
  }

  #[test]
  fn new_event_copies_roster_labels() {
    let player = entry("beginner", "Red", "4", "Sato");
    let event = player.to_new_event(Action::ThreePoint, Quarter::Q3);
    assert_eq!(event.player_name, "Sato");
    assert_eq!(event.bib_type, "home");
    assert_eq!(event.action, Action::ThreePoint);
    assert!(event.validate().is_ok());
    assert_eq!(player.display(), "4 - Sato - home");
  }
}

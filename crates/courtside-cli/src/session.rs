//! Per-scorer state kept between invocations.
//!
//! Bare `courtside undo` removes the event this scorer recorded last, not the
//! newest event in the shared log, so the id is remembered locally.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default state file, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = "courtside-session.toml";

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  /// Id returned by this scorer's most recent `score`/`stat`/`foul`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_insert: Option<i64>,
}

impl Session {
  /// Read the state file; a missing file is an empty session.
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading session {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing session {}", path.display()))
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    let raw = toml::to_string(self).context("serialising session")?;
    std::fs::write(path, raw).with_context(|| format!("writing session {}", path.display()))
  }
}

/// Where the session lives: the explicit path if given, else next to the
/// config file, else the working directory.
pub fn session_path(explicit: Option<PathBuf>, config: Option<&Path>) -> PathBuf {
  explicit.unwrap_or_else(|| match config.and_then(Path::parent) {
    Some(dir) => dir.join(DEFAULT_SESSION_FILE),
    None => PathBuf::from(DEFAULT_SESSION_FILE),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_is_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::load(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(session, Session::default());
  }

  #[test]
  fn last_insert_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_SESSION_FILE);

    Session { last_insert: Some(7) }.save(&path).unwrap();
    assert_eq!(Session::load(&path).unwrap().last_insert, Some(7));

    Session::default().save(&path).unwrap();
    assert_eq!(Session::load(&path).unwrap().last_insert, None);
  }

  #[test]
  fn session_sits_beside_the_config_file() {
    let path = session_path(None, Some(Path::new("/etc/courtside/config.toml")));
    assert_eq!(path, Path::new("/etc/courtside").join(DEFAULT_SESSION_FILE));
    assert_eq!(
      session_path(Some("s.toml".into()), Some(Path::new("/etc/c.toml"))),
      PathBuf::from("s.toml")
    );
  }
}

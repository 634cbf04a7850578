//! SQL schema for the courtside SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `synchronous = FULL` makes every committed write durable before the call
/// returns. `AUTOINCREMENT` keeps ids from being reused after deletes.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = FULL;

-- Rows are inserted and deleted, never updated.
CREATE TABLE IF NOT EXISTS events (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    class          TEXT NOT NULL,
    team           TEXT NOT NULL,
    bib_type       TEXT NOT NULL DEFAULT '',
    uniform_number TEXT NOT NULL,
    player_name    TEXT NOT NULL,
    action         TEXT NOT NULL,   -- '3pt' | 'assist' | 'foul' | ...
    quarter        TEXT NOT NULL,   -- 'Q1' .. 'Q4' | 'OT'
    created_at     TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS events_class_team_idx ON events(class, team);

-- winner / point_diff are write-time snapshots of the scores.
CREATE TABLE IF NOT EXISTS league_matches (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    team_1     TEXT NOT NULL,
    team_2     TEXT NOT NULL,
    score_1    INTEGER NOT NULL CHECK (score_1 >= 0),
    score_2    INTEGER NOT NULL CHECK (score_2 >= 0),
    winner     TEXT,                -- NULL for a draw
    point_diff INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    CHECK (team_1 != team_2)
);

PRAGMA user_version = 1;
";

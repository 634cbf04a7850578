//! `courtside`: command-line scorer for the courtside server.
//!
//! # Usage
//!
//! ```
//! courtside --roster roster.toml score --class beginner --team Red --number 4 3pt --quarter Q2
//! courtside live
//! courtside match record A B 10 7
//! courtside --config ~/.config/courtside/config.toml standings
//! ```

mod client;
mod output;
mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use courtside_core::{
  event::{Action, Category, Quarter},
  roster::{InMemoryRoster, RosterLookup},
};
use serde::Deserialize;
use session::Session;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "courtside", about = "Record and review basketball events")]
struct Cli {
  /// Path to a TOML config file (url, roster).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the courtside server (default: http://localhost:8080).
  #[arg(long, env = "COURTSIDE_URL")]
  url: Option<String>,

  /// TOML roster file used to resolve `--number` to a player.
  #[arg(long, env = "COURTSIDE_ROSTER", value_name = "FILE")]
  roster: Option<PathBuf>,

  /// File remembering this scorer's last recorded event, for `undo`.
  #[arg(long, env = "COURTSIDE_SESSION", value_name = "FILE")]
  session: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

/// Identifies the player and play for one recorded event.
#[derive(Args, Debug)]
struct RecordArgs {
  #[arg(long)]
  class:   String,
  #[arg(long)]
  team:    String,
  /// Uniform number, looked up in the roster within class and team.
  #[arg(long)]
  number:  String,
  /// Action label, e.g. `3pt`, `assist`, `foul`.
  action:  String,
  #[arg(long, short, default_value = "Q1")]
  quarter: String,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Record a scoring play (3pt, 2pt, 1pt).
  Score(RecordArgs),
  /// Record a stat (assist, block, rebound, steal).
  Stat(RecordArgs),
  /// Record an infraction (foul, turnover).
  Foul(RecordArgs),
  /// List the roster for a class and team.
  Players {
    #[arg(long)]
    class: String,
    #[arg(long)]
    team:  String,
  },
  /// Remove one event; defaults to the last one this scorer recorded.
  Undo { id: Option<i64> },
  /// Remove events by id. Unknown ids are skipped.
  Delete {
    #[arg(required = true)]
    ids: Vec<i64>,
  },
  /// Delete every event and restart ids at 1.
  Wipe {
    /// Must be exactly `DELETE`.
    #[arg(long)]
    confirm: String,
  },
  /// Show recent events.
  Log {
    #[arg(long, default_value_t = 20)]
    recent: usize,
    /// Show the whole log instead.
    #[arg(long)]
    all:    bool,
  },
  /// Current score per team, with the per-quarter breakdown.
  Live,
  /// Top scorers.
  Leaderboard {
    #[arg(long)]
    top:   Option<usize>,
    #[arg(long)]
    class: Option<String>,
    #[arg(long, requires = "class")]
    team:  Option<String>,
  },
  /// Group and count events in one category.
  Tally {
    /// `score`, `stat`, or `infraction`.
    category: String,
    #[arg(long)]
    action:   Option<String>,
    /// Comma-separated dimensions, e.g. `class,team,player_name`.
    #[arg(long)]
    dims:     Option<String>,
  },
  /// League match results.
  #[command(subcommand)]
  Match(MatchCommand),
  /// League standings.
  Standings,
  /// Head-to-head grid of every pair of teams.
  HeadToHead,
}

#[derive(Subcommand, Debug)]
enum MatchCommand {
  /// Record a finished match.
  Record {
    team_1:  String,
    team_2:  String,
    #[arg(allow_negative_numbers = true)]
    score_1: i64,
    #[arg(allow_negative_numbers = true)]
    score_2: i64,
  },
  /// Remove a match by id.
  Delete { id: i64 },
  /// List matches, newest first.
  List,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  roster:  Option<PathBuf>,
  #[serde(default)]
  session: Option<PathBuf>,
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading {what} {}", path.display()))?;
  toml::from_str(&raw).with_context(|| format!("parsing {what} {}", path.display()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let file_cfg: ConfigFile = match &cli.config {
    Some(path) => read_toml(path, "config file")?,
    None => ConfigFile::default(),
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: cli
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
  };
  let paths = Paths {
    roster:  cli.roster.or(file_cfg.roster),
    session: session::session_path(cli.session.or(file_cfg.session), cli.config.as_deref()),
  };

  let client = ApiClient::new(api_config)?;
  let text = run(&client, &paths, cli.command).await?;
  print!("{text}");
  Ok(())
}

/// Local files the commands read and write.
struct Paths {
  roster:  Option<PathBuf>,
  session: PathBuf,
}

fn load_roster(path: Option<&Path>) -> Result<InMemoryRoster> {
  let Some(path) = path else {
    bail!("no roster file; pass --roster or set `roster` in the config file");
  };
  read_toml(path, "roster")
}

async fn record(
  client: &ApiClient,
  paths: &Paths,
  args: RecordArgs,
  category: Category,
) -> Result<String> {
  let action = Action::parse(&args.action)?;
  if action.category() != category {
    bail!("{action} is not a {category} action");
  }
  let quarter = Quarter::parse(&args.quarter)?;

  let roster = load_roster(paths.roster.as_deref())?;
  let player = roster
    .find(&args.class, &args.team, &args.number)
    .with_context(|| {
      format!("no player #{} in {} / {}", args.number, args.class, args.team)
    })?;

  let event = client.append(&player.to_new_event(action, quarter)).await?;
  tracing::debug!(id = %event.id, "recorded");
  Session { last_insert: Some(event.id.0) }.save(&paths.session)?;
  Ok(output::events(std::slice::from_ref(&event)))
}

/// Remove `id`, or this scorer's last insertion when `id` is `None`. The
/// remembered id is forgotten once it has been undone.
async fn undo(client: &ApiClient, session_path: &Path, id: Option<i64>) -> Result<String> {
  let mut session = Session::load(session_path)?;
  let Some(id) = id.or(session.last_insert) else {
    return Ok("nothing to undo\n".to_owned());
  };
  let deleted = client.undo(id).await?;
  if session.last_insert == Some(id) {
    session.last_insert = None;
    session.save(session_path)?;
  }
  Ok(if deleted {
    format!("removed event {id}\n")
  } else {
    format!("event {id} was already gone\n")
  })
}

async fn run(client: &ApiClient, paths: &Paths, command: Command) -> Result<String> {
  match command {
    Command::Score(args) => record(client, paths, args, Category::Score).await,
    Command::Stat(args) => record(client, paths, args, Category::Stat).await,
    Command::Foul(args) => record(client, paths, args, Category::Infraction).await,
    Command::Players { class, team } => {
      let roster = load_roster(paths.roster.as_deref())?;
      Ok(output::players(&roster.players(&class, &team)))
    }
    Command::Undo { id } => undo(client, &paths.session, id).await,
    Command::Delete { ids } => {
      let deleted = client.delete(&ids).await?;
      Ok(format!("removed {deleted} of {} events\n", ids.len()))
    }
    Command::Wipe { confirm } => {
      client.wipe(&confirm).await?;
      Ok("event log wiped\n".to_owned())
    }
    Command::Log { recent, all } => {
      let events = client.events((!all).then_some(recent)).await?;
      Ok(output::events(&events))
    }
    Command::Live => {
      let score = client.live_score().await?;
      let pivot = client.quarter_pivot().await?;
      Ok(format!("{}\n{}", output::live_score(&score), output::quarter_pivot(&pivot)))
    }
    Command::Leaderboard { top, class, team } => {
      let rows = client
        .leaderboard(top, class.as_deref(), team.as_deref())
        .await?;
      Ok(output::leaderboard(&rows))
    }
    Command::Tally { category, action, dims } => {
      let rows = client
        .tally(&category, action.as_deref(), dims.as_deref())
        .await?;
      Ok(output::tally(&rows))
    }
    Command::Match(MatchCommand::Record { team_1, team_2, score_1, score_2 }) => {
      let recorded = client.record_match(&team_1, &team_2, score_1, score_2).await?;
      Ok(output::matches(std::slice::from_ref(&recorded)))
    }
    Command::Match(MatchCommand::Delete { id }) => {
      client.delete_match(id).await?;
      Ok(format!("removed match {id}\n"))
    }
    Command::Match(MatchCommand::List) => Ok(output::matches(&client.matches().await?)),
    Command::Standings => Ok(output::standings(&client.standings().await?)),
    Command::HeadToHead => Ok(output::head_to_head(&client.head_to_head().await?)),
  }
}

//! Async HTTP client wrapping the courtside JSON API.

use std::{collections::BTreeMap, time::Duration};

use anyhow::{Context, Result, anyhow};
use courtside_core::{
  aggregate::{LeaderboardRow, QuarterPivot, TallyRow},
  event::{Event, NewEvent},
  league::Match,
  standings::{HeadToHead, TeamRecord},
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

/// Connection settings for the courtside API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the courtside JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct DeletedCount {
  deleted: usize,
}

#[derive(Deserialize)]
struct DeletedFlag {
  deleted: bool,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Send `req` and fail with the server's `{"error"}` message on a non-2xx
  /// status.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
      .unwrap_or_default();
    Err(anyhow!("{what} → {status}: {message}"))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
    let what = format!("GET {path}");
    let resp = self
      .send(self.client.get(self.url(path)).query(query), &what)
      .await?;
    resp.json().await.with_context(|| format!("deserialising {path}"))
  }

  // ── Events ────────────────────────────────────────────────────────────────

  /// `POST /events`
  pub async fn append(&self, input: &NewEvent) -> Result<Event> {
    let resp = self
      .send(self.client.post(self.url("/events")).json(input), "POST /events")
      .await?;
    resp.json().await.context("deserialising event")
  }

  /// `GET /events[?recent=N]`
  pub async fn events(&self, recent: Option<usize>) -> Result<Vec<Event>> {
    let query: Vec<_> = recent.map(|n| ("recent", n.to_string())).into_iter().collect();
    self.get("/events", &query).await
  }

  /// `POST /events/delete`
  pub async fn delete(&self, ids: &[i64]) -> Result<usize> {
    let resp = self
      .send(
        self.client.post(self.url("/events/delete")).json(&json!({ "ids": ids })),
        "POST /events/delete",
      )
      .await?;
    let body: DeletedCount = resp.json().await.context("deserialising delete count")?;
    Ok(body.deleted)
  }

  /// `POST /events/{id}/undo`
  pub async fn undo(&self, id: i64) -> Result<bool> {
    let path = format!("/events/{id}/undo");
    let resp = self
      .send(self.client.post(self.url(&path)), &format!("POST {path}"))
      .await?;
    let body: DeletedFlag = resp.json().await.context("deserialising undo result")?;
    Ok(body.deleted)
  }

  /// `POST /events/wipe`
  pub async fn wipe(&self, confirm: &str) -> Result<()> {
    self
      .send(
        self.client.post(self.url("/events/wipe")).json(&json!({ "confirm": confirm })),
        "POST /events/wipe",
      )
      .await?;
    Ok(())
  }

  // ── Scores ────────────────────────────────────────────────────────────────

  /// `GET /score/live`
  pub async fn live_score(&self) -> Result<BTreeMap<String, u32>> {
    self.get("/score/live", &[]).await
  }

  /// `GET /score/quarters`
  pub async fn quarter_pivot(&self) -> Result<QuarterPivot> {
    self.get("/score/quarters", &[]).await
  }

  /// `GET /tally?category=...`
  pub async fn tally(
    &self,
    category: &str,
    action: Option<&str>,
    dims: Option<&str>,
  ) -> Result<Vec<TallyRow>> {
    let mut query = vec![("category", category.to_owned())];
    query.extend(action.map(|a| ("action", a.to_owned())));
    query.extend(dims.map(|d| ("dims", d.to_owned())));
    self.get("/tally", &query).await
  }

  /// `GET /leaderboard`
  pub async fn leaderboard(
    &self,
    top: Option<usize>,
    class: Option<&str>,
    team: Option<&str>,
  ) -> Result<Vec<LeaderboardRow>> {
    let mut query = Vec::new();
    query.extend(top.map(|n| ("top", n.to_string())));
    query.extend(class.map(|c| ("class", c.to_owned())));
    query.extend(team.map(|t| ("team", t.to_owned())));
    self.get("/leaderboard", &query).await
  }

  // ── League ────────────────────────────────────────────────────────────────

  /// `POST /matches`
  pub async fn record_match(
    &self,
    team_1: &str,
    team_2: &str,
    score_1: i64,
    score_2: i64,
  ) -> Result<Match> {
    let body = json!({
      "team_1": team_1,
      "team_2": team_2,
      "score_1": score_1,
      "score_2": score_2,
    });
    let resp = self
      .send(self.client.post(self.url("/matches")).json(&body), "POST /matches")
      .await?;
    resp.json().await.context("deserialising match")
  }

  /// `DELETE /matches/{id}`
  pub async fn delete_match(&self, id: i64) -> Result<()> {
    let path = format!("/matches/{id}");
    self
      .send(self.client.delete(self.url(&path)), &format!("DELETE {path}"))
      .await?;
    Ok(())
  }

  /// `GET /matches`
  pub async fn matches(&self) -> Result<Vec<Match>> { self.get("/matches", &[]).await }

  /// `GET /standings`
  pub async fn standings(&self) -> Result<Vec<TeamRecord>> {
    self.get("/standings", &[]).await
  }

  /// `GET /head-to-head`
  pub async fn head_to_head(&self) -> Result<HeadToHead> {
    self.get("/head-to-head", &[]).await
  }
}

//! Lichess games API client (NDJSON export).

use chess_core::GameRecord;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::config::ReviewConfig;
use crate::error::ReviewError;

const MILLIS_PER_DAY: i64 = 86_400_000;

pub struct LichessClient {
    client: Client,
    base_url: String,
}

impl LichessClient {
    pub fn new(config: &ReviewConfig) -> Result<Self, ReviewError> {
        let client = Client::builder()
            .user_agent("lichess-review/0.1")
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            base_url: config.lichess_api_base.clone(),
        })
    }

    /// Fetch a user's games, newest first.
    ///
    /// `since`/`until` bound the export by day (inclusive on both ends).
    pub async fn fetch_user_games(
        &self,
        username: &str,
        max_games: Option<usize>,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<Vec<GameRecord>, ReviewError> {
        let url = format!("{}/api/games/user/{}", self.base_url, username);

        let mut params = vec![("pgnInJson", "true".to_string())];
        if let Some(max) = max_games {
            params.push(("max", max.to_string()));
        }
        if let Some(date) = since {
            params.push(("since", day_start_millis(date).to_string()));
        }
        if let Some(date) = until {
            let end = day_start_millis(date) + MILLIS_PER_DAY - 1;
            params.push(("until", end.to_string()));
        }

        // Rate limit
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept", "application/x-ndjson")
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ReviewError::UserNotFound(username.to_string()));
        }
        if !resp.status().is_success() {
            return Err(ReviewError::ApiStatus(resp.status()));
        }

        let text = resp.text().await?;

        let mut games = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(value) => {
                    if let Some(game) = decode_game(&value) {
                        games.push(game);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse Lichess game JSON, skipping line");
                }
            }
        }

        Ok(games)
    }
}

fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Decode one NDJSON line into a game record. Games without a PGN body
/// (e.g. aborted games) are dropped.
fn decode_game(value: &Value) -> Option<GameRecord> {
    let pgn = value.get("pgn").and_then(Value::as_str)?;
    if pgn.is_empty() {
        return None;
    }
    let game_id = value.get("id").and_then(Value::as_str)?.to_string();

    let player_name = |color: &str| {
        value
            .pointer(&format!("/players/{color}/user/name"))
            .and_then(Value::as_str)
            .unwrap_or("Anonymous")
            .to_string()
    };
    let player_rating = |color: &str| {
        value
            .pointer(&format!("/players/{color}/rating"))
            .and_then(Value::as_u64)
            .map(|r| r as u32)
    };

    Some(GameRecord {
        game_id,
        white: player_name("white"),
        black: player_name("black"),
        white_rating: player_rating("white"),
        black_rating: player_rating("black"),
        pgn: pgn.to_string(),
    })
}

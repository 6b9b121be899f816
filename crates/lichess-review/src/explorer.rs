//! Opening-explorer client against the Lichess masters database.
//!
//! A position is "in theory" when the masters database still has
//! continuation moves for it. Lookups are cached in memory per normalized
//! FEN; any network or decode failure degrades to "not in theory" so the
//! analysis never stalls on the explorer.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::ReviewConfig;
use crate::error::ReviewError;

/// Outcome of one theory lookup.
#[derive(Debug, Clone, Default)]
pub struct TheoryEntry {
    pub in_theory: bool,
    pub opening_name: Option<String>,
    pub opening_eco: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    #[serde(default)]
    moves: Vec<ExplorerMove>,
    opening: Option<ExplorerOpening>,
}

#[derive(Debug, Deserialize)]
struct ExplorerMove {
    #[allow(dead_code)]
    uci: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ExplorerOpening {
    eco: String,
    name: String,
}

pub struct OpeningExplorer {
    client: Client,
    base_url: String,
    cache: Mutex<HashMap<String, TheoryEntry>>,
}

impl OpeningExplorer {
    pub fn new(config: &ReviewConfig) -> Result<Self, ReviewError> {
        let client = Client::builder()
            .user_agent("lichess-review/0.1")
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            base_url: config.explorer_api_base.clone(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Look up a position in the masters database.
    pub async fn lookup(&self, fen: &str) -> TheoryEntry {
        let key = normalize_fen(fen);

        {
            let cache = self.cache.lock().await;
            if let Some(entry) = cache.get(&key) {
                return entry.clone();
            }
        }

        match self.query(fen).await {
            Ok(entry) => {
                let mut cache = self.cache.lock().await;
                cache.insert(key, entry.clone());
                entry
            }
            Err(e) => {
                // Transient failures are not cached so a later repeat of the
                // position gets another chance.
                warn!(error = %e, "Opening explorer lookup failed, treating as out of theory");
                TheoryEntry::default()
            }
        }
    }

    async fn query(&self, fen: &str) -> Result<TheoryEntry, ReviewError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("fen", fen), ("moves", "8")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ReviewError::ApiStatus(resp.status()));
        }

        let data: ExplorerResponse = resp.json().await?;
        Ok(TheoryEntry {
            in_theory: !data.moves.is_empty(),
            opening_name: data.opening.as_ref().map(|o| o.name.clone()),
            opening_eco: data.opening.map(|o| o.eco),
        })
    }
}

/// Strips move counters from a FEN, keeping position + side + castling + ep.
pub fn normalize_fen(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

//! Runtime configuration from environment variables

use std::env;

#[derive(Clone, Debug)]
pub struct ReviewConfig {
    /// Path to the UCI engine binary
    pub engine_path: String,

    /// Search depth per evaluated position
    pub eval_depth: u32,

    /// Per-call deadline for one engine evaluation
    pub eval_timeout_secs: u64,

    /// Base URL of the Lichess games API
    pub lichess_api_base: String,

    /// Base URL of the opening explorer (masters database)
    pub explorer_api_base: String,

    /// Worker task count override; defaults to max(2, cpus - 1)
    pub worker_count: Option<usize>,
}

impl ReviewConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn load() -> Self {
        let engine_path =
            env::var("ENGINE_PATH").unwrap_or_else(|_| "stockfish".to_string());

        let eval_depth = env::var("EVAL_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(17);

        let eval_timeout_secs = env::var("EVAL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let lichess_api_base = env::var("LICHESS_API_BASE")
            .unwrap_or_else(|_| "https://lichess.org".to_string());

        let explorer_api_base = env::var("EXPLORER_API_BASE")
            .unwrap_or_else(|_| "https://explorer.lichess.ovh/masters".to_string());

        let worker_count = env::var("WORKER_COUNT").ok().and_then(|v| v.parse().ok());

        Self {
            engine_path,
            eval_depth,
            eval_timeout_secs,
            lichess_api_base,
            explorer_api_base,
            worker_count,
        }
    }
}

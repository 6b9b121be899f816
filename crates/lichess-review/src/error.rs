//! Application error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Lichess user not found: {0}")]
    UserNotFound(String),

    #[error("Lichess API error: HTTP {0}")]
    ApiStatus(reqwest::StatusCode),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PGN error: {0}")]
    Pgn(#[from] chess_core::pgn::PgnError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! Lichess game review: engine sessions, game fetching, the per-move
//! evaluation pipeline and report rendering around the pure
//! `error-analysis` core.

pub use chess;

pub mod config;
pub mod engine;
pub mod error;
pub mod explorer;
pub mod lichess;
pub mod pipeline;
pub mod report;
pub mod san;

pub use error::ReviewError;

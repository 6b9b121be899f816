//! Shared chess domain types and PGN parsing.

pub mod game_data;
pub mod pgn;

pub use game_data::GameRecord;

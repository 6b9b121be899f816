use serde::{Deserialize, Serialize};

/// A single game exported from the Lichess games API.
///
/// Player names and ratings come from the NDJSON `players` object, not
/// from the PGN headers, so anonymous games still carry a placeholder name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub white: String,
    pub black: String,
    pub white_rating: Option<u32>,
    pub black_rating: Option<u32>,
    pub pgn: String,
}

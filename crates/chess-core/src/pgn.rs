//! Lightweight regex-based PGN move extraction.

use regex::Regex;
use thiserror::Error;

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Error)]
pub enum PgnError {
    /// Game starts from a custom position (Chess960, studies, puzzles).
    #[error("game does not start from the standard position")]
    NonStandardStart,
    #[error("no moves found in PGN")]
    NoMoves,
}

/// Extract the SAN move list from a PGN string.
///
/// Headers, comments (including Lichess `[%clk ...]` annotations) and
/// variations are stripped first. Games that declare a custom starting
/// position are rejected since downstream analysis replays from the
/// standard start.
pub fn parse_pgn(pgn: &str) -> Result<Vec<String>, PgnError> {
    let header_re = Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap();

    let mut setup = None;
    let mut fen = None;

    for cap in header_re.captures_iter(pgn) {
        match &cap[1] {
            "SetUp" => setup = Some(cap[2].to_string()),
            "FEN" => fen = Some(cap[2].to_string()),
            _ => {}
        }
    }

    if setup.as_deref() == Some("1") {
        if let Some(ref f) = fen {
            if f != STANDARD_START_FEN {
                return Err(PgnError::NonStandardStart);
            }
        }
    }

    let moves = extract_moves(pgn);
    if moves.is_empty() {
        return Err(PgnError::NoMoves);
    }

    Ok(moves)
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Vec<String> {
    // Remove headers
    let header_re = Regex::new(r"\[[^\]]*\]").unwrap();
    let no_headers = header_re.replace_all(pgn, "");

    // Remove comments
    let comment_re = Regex::new(r"\{[^}]*\}").unwrap();
    let no_comments = comment_re.replace_all(&no_headers, "");

    // Remove variations
    let variation_re = Regex::new(r"\([^)]*\)").unwrap();
    let no_variations = variation_re.replace_all(&no_comments, "");

    // Extract moves
    let move_re =
        Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O").unwrap();

    move_re
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pgn_basic() {
        let pgn = r#"[White "Player1"]
[Black "Player2"]
[Result "1-0"]
[Date "2025.01.15"]
[TimeControl "600"]

1. e4 e5 2. Nf3 Nc6 1-0"#;

        let moves = parse_pgn(pgn).unwrap();
        assert_eq!(moves.len(), 4);
        assert_eq!(moves[0], "e4");
        assert_eq!(moves[3], "Nc6");
    }

    #[test]
    fn test_parse_pgn_strips_clock_comments() {
        let pgn = r#"[Event "Rated blitz game"]

1. d4 { [%clk 0:03:00] } d5 { [%clk 0:03:00] } 2. c4 { [%clk 0:02:58] } e6 0-1"#;

        let moves = parse_pgn(pgn).unwrap();
        assert_eq!(moves, vec!["d4", "d5", "c4", "e6"]);
    }

    #[test]
    fn test_parse_pgn_strips_variations() {
        let pgn = "1. e4 e5 2. Nf3 (2. Bc4 Nf6) Nc6 1/2-1/2";
        let moves = parse_pgn(pgn).unwrap();
        assert_eq!(moves, vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_parse_pgn_rejects_custom_start() {
        let pgn = r#"[SetUp "1"]
[FEN "4k3/8/8/8/8/8/8/4K2R w K - 0 1"]

1. O-O Kd7 *"#;

        assert!(matches!(parse_pgn(pgn), Err(PgnError::NonStandardStart)));
    }

    #[test]
    fn test_parse_pgn_no_moves() {
        let pgn = r#"[White "Player1"]
[Black "Player2"]

*"#;
        assert!(matches!(parse_pgn(pgn), Err(PgnError::NoMoves)));
    }

    #[test]
    fn test_castling_and_promotion_tokens() {
        let pgn = "1. e4 d5 2. exd5 c6 3. dxc6 Qd7 4. cxb7 Qe6+ 5. bxa8=Q O-O-O 1-0";
        let moves = parse_pgn(pgn).unwrap();
        assert_eq!(moves[8], "bxa8=Q");
        assert_eq!(moves[9], "O-O-O");
    }
}

//! SAN resolution against a board's legal moves.

use chess::{Board, ChessMove, MoveGen, Piece};

use crate::error::ReviewError;

/// Render a move in long-form coordinate (UCI) notation.
pub fn move_to_uci(chess_move: &ChessMove) -> String {
    format!(
        "{}{}{}",
        chess_move.get_source(),
        chess_move.get_dest(),
        chess_move
            .get_promotion()
            .map(|p| match p {
                Piece::Queen => "q",
                Piece::Rook => "r",
                Piece::Bishop => "b",
                Piece::Knight => "n",
                _ => "",
            })
            .unwrap_or("")
    )
}

/// Resolve a SAN token to the matching legal move on `board`.
pub fn san_to_move(board: &Board, san: &str) -> Result<ChessMove, ReviewError> {
    let clean = san.trim_end_matches(|c: char| c == '+' || c == '#' || c == '!' || c == '?');

    let legal_moves: Vec<ChessMove> = MoveGen::new_legal(board).collect();

    // Handle castling
    if clean == "O-O" || clean == "0-0" {
        return find_castling(board, &legal_moves, true)
            .ok_or_else(|| ReviewError::Analysis(format!("No kingside castling move for: {san}")));
    }
    if clean == "O-O-O" || clean == "0-0-0" {
        return find_castling(board, &legal_moves, false).ok_or_else(|| {
            ReviewError::Analysis(format!("No queenside castling move for: {san}"))
        });
    }

    // Parse piece, disambiguation, capture, destination, promotion
    let bytes = clean.as_bytes();
    if bytes.is_empty() {
        return Err(ReviewError::Analysis("Empty SAN move".to_string()));
    }

    let (piece, rest) = if bytes[0].is_ascii_uppercase() {
        let p = match bytes[0] {
            b'K' => Piece::King,
            b'Q' => Piece::Queen,
            b'R' => Piece::Rook,
            b'B' => Piece::Bishop,
            b'N' => Piece::Knight,
            _ => {
                return Err(ReviewError::Analysis(format!(
                    "Unknown piece: {}",
                    bytes[0] as char
                )))
            }
        };
        (p, &clean[1..])
    } else {
        (Piece::Pawn, clean)
    };

    // Extract promotion
    let (rest, promotion) = if let Some(eq_pos) = rest.find('=') {
        let promo_piece = match rest.as_bytes().get(eq_pos + 1) {
            Some(b'Q') => Some(Piece::Queen),
            Some(b'R') => Some(Piece::Rook),
            Some(b'B') => Some(Piece::Bishop),
            Some(b'N') => Some(Piece::Knight),
            _ => None,
        };
        (&rest[..eq_pos], promo_piece)
    } else {
        (rest, None)
    };

    // Remove captures marker
    let rest = rest.replace('x', "");

    // The last two characters are the destination square
    let rest_bytes = rest.as_bytes();
    if rest_bytes.len() < 2 {
        return Err(ReviewError::Analysis(format!("SAN too short: {san}")));
    }

    let dest_file = rest_bytes[rest_bytes.len() - 2];
    let dest_rank = rest_bytes[rest_bytes.len() - 1];

    if !(b'a'..=b'h').contains(&dest_file) || !(b'1'..=b'8').contains(&dest_rank) {
        return Err(ReviewError::Analysis(format!(
            "Invalid destination in SAN: {san}"
        )));
    }

    let dest = chess::Square::make_square(
        chess::Rank::from_index((dest_rank - b'1') as usize),
        chess::File::from_index((dest_file - b'a') as usize),
    );

    // Disambiguation
    let disambig = &rest[..rest.len() - 2];

    let mut candidates: Vec<ChessMove> = legal_moves
        .into_iter()
        .filter(|m| {
            m.get_dest() == dest
                && board.piece_on(m.get_source()) == Some(piece)
                && m.get_promotion() == promotion
        })
        .collect();

    if candidates.len() == 1 {
        return Ok(candidates[0]);
    }

    if !disambig.is_empty() {
        let disambig_bytes = disambig.as_bytes();
        candidates.retain(|m| {
            let src = m.get_source();
            for &b in disambig_bytes {
                if (b'a'..=b'h').contains(&b) {
                    if src.get_file().to_index() != (b - b'a') as usize {
                        return false;
                    }
                } else if (b'1'..=b'8').contains(&b)
                    && src.get_rank().to_index() != (b - b'1') as usize
                {
                    return false;
                }
            }
            true
        });
    }

    match candidates.len() {
        1 => Ok(candidates[0]),
        0 => Err(ReviewError::Analysis(format!(
            "No legal move matches SAN: {san}"
        ))),
        n => Err(ReviewError::Analysis(format!(
            "Ambiguous SAN: {san} ({n} candidates)"
        ))),
    }
}

fn find_castling(board: &Board, legal_moves: &[ChessMove], kingside: bool) -> Option<ChessMove> {
    legal_moves.iter().copied().find(|m| {
        let src = m.get_source();
        let dst = m.get_dest();
        if board.piece_on(src) != Some(Piece::King) {
            return false;
        }
        let src_file = src.get_file().to_index();
        let dst_file = dst.get_file().to_index();
        if kingside {
            dst_file > src_file && dst_file - src_file == 2
        } else {
            src_file > dst_file && src_file - dst_file == 2
        }
    })
}

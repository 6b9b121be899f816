//! Board queries used by tactical detection and the evaluation pipeline.

use chess::{BitBoard, Board, Color, File, Piece, Rank, Square, EMPTY};

use crate::types::GamePhase;

// Material accounting values in centipawns
pub const PAWN_CP: i32 = 100;
pub const KNIGHT_CP: i32 = 320;
pub const BISHOP_CP: i32 = 330;
pub const ROOK_CP: i32 = 500;
pub const QUEEN_CP: i32 = 900;

/// Piece value used for material accounting, in centipawns.
pub fn material_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_CP,
        Piece::Knight => KNIGHT_CP,
        Piece::Bishop => BISHOP_CP,
        Piece::Rook => ROOK_CP,
        Piece::Queen => QUEEN_CP,
        Piece::King => 0,
    }
}

/// Piece value used by the tactical detectors, in centipawns.
///
/// Coarser than the material scale: minor pieces are both worth 300 so the
/// "piece worth a minor or more" and "piece worth a rook or more" thresholds
/// read directly as 300 and 500.
pub fn detector_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 300,
        Piece::Bishop => 300,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

/// Pawn attack squares (just the diagonal attacks, not pushes).
pub fn pawn_attacks(square: Square, color: Color) -> BitBoard {
    let file = square.get_file().to_index();
    let rank = square.get_rank().to_index();

    let mut result = EMPTY;

    match color {
        Color::White => {
            if rank < 7 {
                if file > 0 {
                    result |= BitBoard::from_square(Square::make_square(
                        Rank::from_index(rank + 1),
                        File::from_index(file - 1),
                    ));
                }
                if file < 7 {
                    result |= BitBoard::from_square(Square::make_square(
                        Rank::from_index(rank + 1),
                        File::from_index(file + 1),
                    ));
                }
            }
        }
        Color::Black => {
            if rank > 0 {
                if file > 0 {
                    result |= BitBoard::from_square(Square::make_square(
                        Rank::from_index(rank - 1),
                        File::from_index(file - 1),
                    ));
                }
                if file < 7 {
                    result |= BitBoard::from_square(Square::make_square(
                        Rank::from_index(rank - 1),
                        File::from_index(file + 1),
                    ));
                }
            }
        }
    }

    result
}

/// All pieces of `color` that attack `square`.
///
/// Pawns are found by reverse lookup: pawn attacks FROM the target square
/// with the OPPOSITE color, intersected with actual pawns.
pub fn attackers(board: &Board, color: Color, square: Square) -> BitBoard {
    let occupied = *board.combined();
    let color_pieces = *board.color_combined(color);

    let mut result = EMPTY;

    let pawn_atk = pawn_attacks(square, !color);
    result |= pawn_atk & *board.pieces(Piece::Pawn) & color_pieces;

    let knight_atk = chess::get_knight_moves(square);
    result |= knight_atk & *board.pieces(Piece::Knight) & color_pieces;

    let king_atk = chess::get_king_moves(square);
    result |= king_atk & *board.pieces(Piece::King) & color_pieces;

    let bishop_atk = chess::get_bishop_moves(square, occupied);
    result |= bishop_atk
        & (*board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen))
        & color_pieces;

    let rook_atk = chess::get_rook_moves(square, occupied);
    result |= rook_atk & (*board.pieces(Piece::Rook) | *board.pieces(Piece::Queen)) & color_pieces;

    result
}

/// Material for one side, in centipawns.
pub fn material_count(board: &Board, color: Color) -> i32 {
    let color_bb = *board.color_combined(color);
    let pawns = (*board.pieces(Piece::Pawn) & color_bb).popcnt() as i32;
    let knights = (*board.pieces(Piece::Knight) & color_bb).popcnt() as i32;
    let bishops = (*board.pieces(Piece::Bishop) & color_bb).popcnt() as i32;
    let rooks = (*board.pieces(Piece::Rook) & color_bb).popcnt() as i32;
    let queens = (*board.pieces(Piece::Queen) & color_bb).popcnt() as i32;

    pawns * PAWN_CP
        + knights * KNIGHT_CP
        + bishops * BISHOP_CP
        + rooks * ROOK_CP
        + queens * QUEEN_CP
}

/// Material difference in centipawns (positive = `side` has more).
pub fn material_diff(board: &Board, side: Color) -> i32 {
    material_count(board, side) - material_count(board, !side)
}

/// Knights, bishops, rooks and queens on the board, both sides.
pub fn minor_major_count(board: &Board) -> u32 {
    (*board.pieces(Piece::Knight)
        | *board.pieces(Piece::Bishop)
        | *board.pieces(Piece::Rook)
        | *board.pieces(Piece::Queen))
    .popcnt()
}

/// Phase heuristic: theory hits are opening by definition, six or fewer
/// minor/major pieces make an endgame, the first six fullmoves are opening,
/// everything else is middlegame.
pub fn detect_phase(board: &Board, move_number: u32, in_opening_theory: bool) -> GamePhase {
    if in_opening_theory {
        return GamePhase::Opening;
    }
    if minor_major_count(board) <= 6 {
        return GamePhase::Endgame;
    }
    if move_number <= 6 {
        return GamePhase::Opening;
    }
    GamePhase::Middlegame
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_material_count_starting() {
        let board = Board::default();
        // 8 pawns + 2 knights + 2 bishops + 2 rooks + 1 queen
        assert_eq!(material_count(&board, Color::White), 4000);
        assert_eq!(material_count(&board, Color::Black), 4000);
        assert_eq!(material_diff(&board, Color::White), 0);
    }

    #[test]
    fn test_material_diff_up_a_rook() {
        let board = Board::from_str("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(material_diff(&board, Color::White), 500);
        assert_eq!(material_diff(&board, Color::Black), -500);
    }

    #[test]
    fn test_pawn_attacks() {
        let e4 = Square::make_square(Rank::Fourth, File::E);
        let white_atk = pawn_attacks(e4, Color::White);
        let d5 = Square::make_square(Rank::Fifth, File::D);
        let f5 = Square::make_square(Rank::Fifth, File::F);
        assert!((white_atk & BitBoard::from_square(d5)).popcnt() > 0);
        assert!((white_atk & BitBoard::from_square(f5)).popcnt() > 0);
        assert_eq!(white_atk.popcnt(), 2);
    }

    #[test]
    fn test_attackers_reverse_lookup() {
        // White knight on f3 attacks e5
        let board =
            Board::from_str("rnbqkbnr/pppppppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2")
                .unwrap();
        let e5 = Square::make_square(Rank::Fifth, File::E);
        let white_attackers = attackers(&board, Color::White, e5);
        let f3 = Square::make_square(Rank::Third, File::F);
        assert!((white_attackers & BitBoard::from_square(f3)).popcnt() > 0);
    }

    #[test]
    fn test_detect_phase() {
        let start = Board::default();
        assert_eq!(detect_phase(&start, 1, false), GamePhase::Opening);
        assert_eq!(detect_phase(&start, 20, false), GamePhase::Middlegame);
        assert_eq!(detect_phase(&start, 20, true), GamePhase::Opening);

        let bare = Board::from_str("8/8/4k3/8/8/4K3/8/8 w - - 0 40").unwrap();
        assert_eq!(detect_phase(&bare, 40, false), GamePhase::Endgame);
    }
}

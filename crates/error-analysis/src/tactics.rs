//! Tactical pattern detection on the position left behind by a judged move.
//!
//! The side to move in that position is the attacker; the player who just
//! moved is the victim. All four checks are cheap bitboard queries or a
//! one-ply lookahead, not a forced-sequence search.

use chess::{Board, MoveGen, Piece, EMPTY};

use crate::board::{attackers, detector_value};

/// Which detector fired. Checks run cheapest-first and short-circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TacticalPattern {
    HangingPiece,
    Fork,
    StrongPin,
    PositionCollapse,
}

/// Run all four detectors against the post-move position.
///
/// `legal_moves_before` and `cp_loss` describe the judged move itself and
/// feed the position-collapse check only.
pub fn detect(board_after: &Board, legal_moves_before: u32, cp_loss: i32) -> Option<TacticalPattern> {
    if has_hanging_piece(board_after) {
        return Some(TacticalPattern::HangingPiece);
    }
    if has_fork(board_after) {
        return Some(TacticalPattern::Fork);
    }
    if has_strong_pin(board_after) {
        return Some(TacticalPattern::StrongPin);
    }
    if is_position_collapsed(legal_moves_before, cp_loss) {
        return Some(TacticalPattern::PositionCollapse);
    }
    None
}

/// A victim piece worth a minor or more has more attackers than defenders.
pub fn has_hanging_piece(board: &Board) -> bool {
    let attacker = board.side_to_move();
    let victim = !attacker;

    for sq in *board.color_combined(victim) {
        let piece = match board.piece_on(sq) {
            Some(p) => p,
            None => continue,
        };
        if detector_value(piece) < 300 {
            continue;
        }

        let attacker_count = attackers(board, attacker, sq).popcnt();
        let defender_count = attackers(board, victim, sq).popcnt();
        if attacker_count > defender_count {
            return true;
        }
    }
    false
}

/// Some legal attacker reply leaves two or more victim non-king pieces worth
/// a rook or more simultaneously attacked.
///
/// Existence check over one-ply lookahead. Boards are cloned per candidate
/// reply, never mutated in place.
pub fn has_fork(board: &Board) -> bool {
    let attacker = board.side_to_move();
    let victim = !attacker;

    for reply in MoveGen::new_legal(board) {
        let after = board.make_move_new(reply);
        let mut valuable_targets = 0;

        for sq in *after.color_combined(victim) {
            let piece = match after.piece_on(sq) {
                Some(p) => p,
                None => continue,
            };
            if piece == Piece::King || detector_value(piece) < 500 {
                continue;
            }
            if attackers(&after, attacker, sq) != EMPTY {
                valuable_targets += 1;
            }
        }

        if valuable_targets >= 2 {
            return true;
        }
    }
    false
}

/// Any victim piece worth a minor or more stands attacked by the side to
/// move.
///
/// Coarse by construction: there is no ray or immobilization check, so every
/// attacked valuable piece counts as "pinned". Known to over-detect; true
/// pin verification would need deeper search and belongs to a different
/// detector.
pub fn has_strong_pin(board: &Board) -> bool {
    let attacker = board.side_to_move();
    let victim = !attacker;

    for sq in *board.color_combined(victim) {
        let piece = match board.piece_on(sq) {
            Some(p) => p,
            None => continue,
        };
        if detector_value(piece) < 300 {
            continue;
        }
        if attackers(board, attacker, sq) != EMPTY {
            return true;
        }
    }
    false
}

/// The mover had three or fewer legal moves and still lost 150+ centipawns:
/// the position collapsed through scarcity of alternatives.
pub fn is_position_collapsed(legal_moves_before: u32, cp_loss: i32) -> bool {
    legal_moves_before <= 3 && cp_loss >= 150
}

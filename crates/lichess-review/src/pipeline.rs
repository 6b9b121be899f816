//! Per-game evaluation pipeline: walks a game's moves, probes the engine
//! around each move by the target player, builds the raw evaluation record
//! and feeds it to the classifier.

use chess::{Board, ChessMove, Color, MoveGen, Piece};
use tracing::{info, warn};

use chess_core::{pgn, GameRecord};
use error_analysis::board::{detect_phase, material_diff};
use error_analysis::{classify, GameError, RawMoveEvaluation};

use crate::config::ReviewConfig;
use crate::engine::UciEngine;
use crate::error::ReviewError;
use crate::explorer::OpeningExplorer;
use crate::san::{move_to_uci, san_to_move};

/// Evaluation magnitude past which a score reads as forced mate.
const MATE_RANGE_CP: i32 = 9000;

/// Which color the given user played in a game, matched case-insensitively.
/// `None` when the user is not one of the players.
pub fn player_side(game: &GameRecord, username: &str) -> Option<Color> {
    if game.white.eq_ignore_ascii_case(username) {
        Some(Color::White)
    } else if game.black.eq_ignore_ascii_case(username) {
        Some(Color::Black)
    } else {
        None
    }
}

/// Analyze every move the target side played in one game.
///
/// Per-move problems (unusable engine score, undecodable position) are
/// logged and skipped; only structural failures (bad PGN, dead engine)
/// abort the game.
pub async fn analyze_game(
    engine: &mut UciEngine,
    explorer: &OpeningExplorer,
    config: &ReviewConfig,
    game: &GameRecord,
    target: Color,
) -> Result<Vec<GameError>, ReviewError> {
    let san_moves = pgn::parse_pgn(&game.pgn)?;
    info!(game_id = %game.game_id, moves = san_moves.len(), "Starting game analysis");

    let mut board = Board::default();
    let mut errors = Vec::new();
    let mut opening_name: Option<String> = None;
    let mut opening_eco: Option<String> = None;

    for (ply, san) in san_moves.iter().enumerate() {
        let mover = board.side_to_move();
        let move_number = ply as u32 / 2 + 1;

        let chess_move = san_to_move(&board, san)?;
        let board_after = board.make_move_new(chess_move);

        if mover != target {
            board = board_after;
            continue;
        }

        let fen_before = board.to_string();
        let fen_after = board_after.to_string();

        let legal_moves_before = MoveGen::new_legal(&board).len() as u32;

        // Probe 1: the position the mover faced. The score doubles as the
        // best-possible outcome since it assumes the engine's top move.
        // A failed probe loses this move only, not the rest of the game.
        let probe_before = match engine.evaluate(&fen_before, config.eval_depth).await {
            Ok(probe) => probe,
            Err(e) => {
                warn!(game_id = %game.game_id, move_number, error = %e, "Evaluation unavailable, skipping move");
                board = board_after;
                continue;
            }
        };
        let mut low_confidence = false;
        let best_eval = probe_before.mover_cp().unwrap_or_else(|| {
            low_confidence = true;
            0
        });
        let best_move_uci = probe_before.best_move.clone().unwrap_or_default();

        // Probe 2: the position left behind. Opponent to move, so the score
        // is negated back to the mover's perspective.
        let probe_after = match engine.evaluate(&fen_after, config.eval_depth).await {
            Ok(probe) => probe,
            Err(e) => {
                warn!(game_id = %game.game_id, move_number, error = %e, "Evaluation unavailable, skipping move");
                board = board_after;
                continue;
            }
        };
        let eval_after = probe_after
            .mover_cp()
            .map(|cp| -cp)
            .unwrap_or_else(|| {
                low_confidence = true;
                0
            });

        let cp_loss = (best_eval - eval_after).max(0);

        let material_balance = material_diff(&board_after, target);
        let material_delta = material_balance - material_diff(&board, target);
        let relative_cp_loss = if material_balance != 0 {
            cp_loss as f64 / material_balance.abs() as f64
        } else {
            cp_loss as f64
        };

        let theory = explorer.lookup(&fen_before).await;
        if opening_name.is_none() {
            opening_name = theory.opening_name.clone();
            opening_eco = theory.opening_eco.clone();
        }

        let phase = detect_phase(&board_after, move_number, theory.in_theory);

        let evaluation = RawMoveEvaluation {
            game_id: game.game_id.clone(),
            move_number,
            side: mover.into(),
            san: san.clone(),
            uci: move_to_uci(&chess_move),
            best_move_uci,
            fen_before,
            fen_after,
            eval_before: best_eval,
            eval_after,
            best_eval,
            cp_loss,
            relative_cp_loss,
            legal_moves_before,
            forced: legal_moves_before <= 1,
            material_balance,
            material_delta,
            phase,
            is_capture: is_capture(&board, chess_move),
            gives_check: board_after.checkers().popcnt() > 0,
            is_promotion: chess_move.get_promotion().is_some(),
            mate_threat: eval_after.abs() > MATE_RANGE_CP && best_eval.abs() <= MATE_RANGE_CP,
            in_opening_theory: theory.in_theory,
            opening_name: opening_name.clone(),
            opening_eco: opening_eco.clone(),
            low_confidence,
        };

        match classify(&evaluation) {
            Ok(Some(error)) => errors.push(error),
            Ok(None) => {}
            Err(e) => {
                warn!(
                    game_id = %game.game_id,
                    move_number,
                    error = %e,
                    "Move could not be classified, skipping"
                );
            }
        }

        board = board_after;
    }

    info!(
        game_id = %game.game_id,
        errors = errors.len(),
        "Game analysis complete"
    );
    Ok(errors)
}

/// Capture test covering en passant: the destination square is occupied, or
/// a pawn leaves its file without one.
fn is_capture(board: &Board, chess_move: ChessMove) -> bool {
    if board.piece_on(chess_move.get_dest()).is_some() {
        return true;
    }
    board.piece_on(chess_move.get_source()) == Some(Piece::Pawn)
        && chess_move.get_source().get_file() != chess_move.get_dest().get_file()
}

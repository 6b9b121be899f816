//! Severity and cause classification for evaluated moves.

use std::str::FromStr;

use chess::Board;
use thiserror::Error;

use crate::tactics;
use crate::types::{ErrorCategory, ErrorSeverity, GameError, GamePhase, RawMoveEvaluation};

/// Moves losing less than this many centipawns are never judged.
pub const MIN_ERROR_CP: i32 = 20;

/// Fullmove cutoff past which a theory position no longer counts as a
/// memorization gap.
const THEORY_MOVE_CUTOFF: u32 = 12;

/// Evaluation swing that makes a forcing move read as tactical.
const TACTICAL_SWING_CP: i32 = 150;

/// Material that must be at stake for the forcing-move tactical rule.
const TACTICAL_MATERIAL_CP: i32 = 200;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("invalid FEN in evaluation record: {0}")]
    InvalidFen(String),
}

/// Map a centipawn loss to its severity tier.
pub fn classify_severity(cp_loss: i32) -> ErrorSeverity {
    if cp_loss > 150 {
        ErrorSeverity::Blunder
    } else if cp_loss >= 50 {
        ErrorSeverity::Mistake
    } else {
        ErrorSeverity::Inaccuracy
    }
}

/// Assign a cause category. Rules run in order and the first hit wins:
/// theory gaps outrank tactics, tactics outrank the endgame and
/// strategic/positional fallbacks.
pub fn classify_category(
    eval: &RawMoveEvaluation,
    severity: ErrorSeverity,
    board_after: &Board,
) -> ErrorCategory {
    // A loss while still in book is a memorization gap, not calculation
    if eval.phase == GamePhase::Opening
        && eval.in_opening_theory
        && eval.move_number <= THEORY_MOVE_CUTOFF
    {
        return ErrorCategory::OpeningKnowledge;
    }

    let eval_swing = (eval.eval_before - eval.eval_after).abs();
    let forcing_move = eval.is_capture || eval.gives_check || eval.is_promotion;
    if tactics::detect(board_after, eval.legal_moves_before, eval.cp_loss).is_some()
        || (forcing_move
            && eval_swing >= TACTICAL_SWING_CP
            && eval.material_balance.abs() >= TACTICAL_MATERIAL_CP)
    {
        return ErrorCategory::Tactical;
    }

    // Level-material endgame: the loss is technical
    if eval.phase == GamePhase::Endgame && eval.material_balance.abs() <= 500 {
        return ErrorCategory::EndgameTechnique;
    }

    if severity != ErrorSeverity::Inaccuracy {
        return if eval.material_balance.abs() < 300 {
            ErrorCategory::Strategic
        } else {
            ErrorCategory::Positional
        };
    }

    ErrorCategory::Positional
}

/// Judge one evaluated move.
///
/// Returns `Ok(None)` when the loss is below [`MIN_ERROR_CP`]. The only
/// failure mode is an undecodable post-move position, which callers treat
/// as a recoverable per-move problem rather than aborting the game.
pub fn classify(eval: &RawMoveEvaluation) -> Result<Option<GameError>, ClassifyError> {
    if eval.cp_loss < MIN_ERROR_CP {
        return Ok(None);
    }

    let board_after = Board::from_str(&eval.fen_after)
        .map_err(|_| ClassifyError::InvalidFen(eval.fen_after.clone()))?;

    let severity = classify_severity(eval.cp_loss);
    let category = classify_category(eval, severity, &board_after);

    Ok(Some(GameError::from_evaluation(eval, severity, category)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerSide;

    /// Quiet king move on a bare-kings board: no detector can fire.
    fn quiet_eval(cp_loss: i32) -> RawMoveEvaluation {
        RawMoveEvaluation {
            game_id: "test-game".to_string(),
            move_number: 20,
            side: PlayerSide::White,
            san: "Kb1".to_string(),
            uci: "a1b1".to_string(),
            best_move_uci: "a1a2".to_string(),
            fen_before: "k7/8/8/8/8/8/8/K7 w - - 0 20".to_string(),
            fen_after: "k7/8/8/8/8/8/8/1K6 b - - 1 20".to_string(),
            eval_before: 0,
            eval_after: -cp_loss,
            best_eval: 0,
            cp_loss,
            relative_cp_loss: cp_loss as f64,
            legal_moves_before: 10,
            forced: false,
            material_balance: 0,
            material_delta: 0,
            phase: GamePhase::Middlegame,
            is_capture: false,
            gives_check: false,
            is_promotion: false,
            mate_threat: false,
            in_opening_theory: false,
            opening_name: None,
            opening_eco: None,
            low_confidence: false,
        }
    }

    #[test]
    fn test_below_threshold_is_not_judged() {
        assert!(classify(&quiet_eval(19)).unwrap().is_none());
        assert!(classify(&quiet_eval(0)).unwrap().is_none());
        assert!(classify(&quiet_eval(20)).unwrap().is_some());
    }

    #[test]
    fn test_severity_boundaries() {
        assert_eq!(classify_severity(49), ErrorSeverity::Inaccuracy);
        assert_eq!(classify_severity(50), ErrorSeverity::Mistake);
        assert_eq!(classify_severity(150), ErrorSeverity::Mistake);
        assert_eq!(classify_severity(151), ErrorSeverity::Blunder);
    }

    #[test]
    fn test_theory_loss_is_opening_knowledge() {
        let mut eval = quiet_eval(60);
        eval.phase = GamePhase::Opening;
        eval.in_opening_theory = true;
        eval.move_number = 8;

        let error = classify(&eval).unwrap().unwrap();
        assert_eq!(error.category, ErrorCategory::OpeningKnowledge);
        assert_eq!(error.severity, ErrorSeverity::Mistake);
    }

    #[test]
    fn test_theory_cutoff_falls_through() {
        let mut eval = quiet_eval(60);
        eval.phase = GamePhase::Opening;
        eval.in_opening_theory = true;
        eval.move_number = 13;

        let error = classify(&eval).unwrap().unwrap();
        assert_ne!(error.category, ErrorCategory::OpeningKnowledge);
    }

    #[test]
    fn test_forcing_capture_with_swing_is_tactical() {
        let mut eval = quiet_eval(200);
        eval.is_capture = true;
        eval.eval_before = 100;
        eval.eval_after = -100;
        eval.material_balance = 250;

        let error = classify(&eval).unwrap().unwrap();
        assert_eq!(error.category, ErrorCategory::Tactical);
    }

    #[test]
    fn test_capture_without_material_at_stake_is_not_tactical() {
        let mut eval = quiet_eval(200);
        eval.is_capture = true;
        eval.eval_before = 100;
        eval.eval_after = -100;
        eval.material_balance = 100;

        let error = classify(&eval).unwrap().unwrap();
        assert_eq!(error.category, ErrorCategory::Strategic);
        assert_eq!(error.severity, ErrorSeverity::Blunder);
    }

    #[test]
    fn test_big_quiet_loss_with_imbalance_is_positional() {
        let mut eval = quiet_eval(400);
        eval.material_balance = -350;

        let error = classify(&eval).unwrap().unwrap();
        assert_eq!(error.category, ErrorCategory::Positional);
    }

    #[test]
    fn test_inaccuracy_defaults_to_positional() {
        let error = classify(&quiet_eval(30)).unwrap().unwrap();
        assert_eq!(error.severity, ErrorSeverity::Inaccuracy);
        assert_eq!(error.category, ErrorCategory::Positional);
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        let mut eval = quiet_eval(100);
        eval.fen_after = "not a fen".to_string();
        assert!(matches!(
            classify(&eval),
            Err(ClassifyError::InvalidFen(_))
        ));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let mut eval = quiet_eval(90);
        eval.phase = GamePhase::Endgame;
        eval.material_balance = 200;

        let first = classify(&eval).unwrap();
        let second = classify(&eval).unwrap();
        assert_eq!(first, second);
    }
}

use error_analysis::types::{GamePhase, PlayerSide, RawMoveEvaluation};

/// Baseline evaluation record: a quiet king move on a bare-kings board in
/// the middlegame, so no tactical detector can fire. Tests override the
/// fields that matter to them.
pub fn evaluation(cp_loss: i32) -> RawMoveEvaluation {
    RawMoveEvaluation {
        game_id: "integration".to_string(),
        move_number: 25,
        side: PlayerSide::White,
        san: "Kb1".to_string(),
        uci: "a1b1".to_string(),
        best_move_uci: "a1a2".to_string(),
        fen_before: "k7/8/8/8/8/8/8/K7 w - - 0 25".to_string(),
        fen_after: "k7/8/8/8/8/8/8/1K6 b - - 1 25".to_string(),
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

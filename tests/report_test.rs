//! End-to-end test of the offline path: PGN text through the board walk,
//! classification, aggregation and report rendering. No network or engine.

mod common;

use std::str::FromStr;

use chess::{Board, MoveGen};
use error_analysis::board::{detect_phase, material_diff};
use error_analysis::{classify, AnalysisResult};
use lichess_review::report::render_html;
use lichess_review::san::{move_to_uci, san_to_move};

use common::evaluation;

const SCHOLARS_MATE: &str = r#"[White "attacker"]
[Black "victim"]
[Result "1-0"]

1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0"#;

#[test]
fn pgn_walk_feeds_the_classifier() {
    let san_moves = chess_core::pgn::parse_pgn(SCHOLARS_MATE).unwrap();
    assert_eq!(san_moves.len(), 7);

    // Walk the game judging Black's 3... Nf6, the losing move.
    let mut board = Board::default();
    let mut fatal = None;
    for (ply, san) in san_moves.iter().enumerate() {
        let fen_before = board.to_string();
        let legal_moves_before = MoveGen::new_legal(&board).len() as u32;
        let chess_move = san_to_move(&board, san).unwrap();
        let board_after = board.make_move_new(chess_move);

        if san == "Nf6" {
            let mut eval = evaluation(0);
            eval.side = error_analysis::types::PlayerSide::Black;
            eval.move_number = ply as u32 / 2 + 1;
            eval.san = san.clone();
            eval.uci = move_to_uci(&chess_move);
            eval.fen_before = fen_before;
            eval.fen_after = board_after.to_string();
            eval.legal_moves_before = legal_moves_before;
            eval.material_balance = material_diff(&board_after, chess::Color::Black);
            eval.phase = detect_phase(&board_after, eval.move_number, false);
            // Mover's perspective: mate in one allowed, best line was level
            eval.best_eval = 0;
            eval.eval_before = 0;
            eval.eval_after = -9990;
            eval.cp_loss = 9990;
            eval.mate_threat = true;
            fatal = Some(eval);
        }
        board = board_after;
    }

    let fatal = fatal.expect("Nf6 not found in game");
    assert_eq!(fatal.uci, "g8f6");
    assert_eq!(fatal.material_balance, 0);

    let error = classify(&fatal).unwrap().unwrap();
    assert_eq!(error.severity, error_analysis::types::ErrorSeverity::Blunder);

    let result = AnalysisResult::new(vec![error], 1);
    let html = render_html(&result);
    assert!(html.contains("severity-BLUNDER"));
    assert!(html.contains("Nf6"));
    assert!(html.contains("g8f6"));
}

#[test]
fn final_position_of_the_walk_is_checkmate() {
    let san_moves = chess_core::pgn::parse_pgn(SCHOLARS_MATE).unwrap();
    let mut board = Board::default();
    for san in &san_moves {
        let chess_move = san_to_move(&board, san).unwrap();
        board = board.make_move_new(chess_move);
    }
    assert_eq!(MoveGen::new_legal(&board).len(), 0);
    assert!(board.checkers().popcnt() > 0);

    // And the FEN round-trips through the rules engine
    let reparsed = Board::from_str(&board.to_string()).unwrap();
    assert_eq!(reparsed.side_to_move(), chess::Color::Black);
}

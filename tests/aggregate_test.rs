//! Integration tests for aggregation: errors produced by the real
//! classifier, collected into an `AnalysisResult`.

mod common;

use error_analysis::types::{ErrorCategory, ErrorSeverity, GameError, GamePhase, PlayerSide};
use error_analysis::{advice, classify, AnalysisResult};

use common::evaluation;

/// Classify a record shaped to land in the given category.
fn judged(category: ErrorCategory) -> GameError {
    let mut eval = match category {
        ErrorCategory::Tactical => {
            let mut eval = evaluation(200);
            eval.is_capture = true;
            eval.eval_before = 100;
            eval.eval_after = -100;
            eval.material_balance = 250;
            eval
        }
        ErrorCategory::EndgameTechnique => {
            let mut eval = evaluation(80);
            eval.phase = GamePhase::Endgame;
            eval.material_balance = 200;
            eval
        }
        ErrorCategory::Strategic => {
            let mut eval = evaluation(400);
            eval.material_balance = 100;
            eval
        }
        ErrorCategory::OpeningKnowledge => {
            let mut eval = evaluation(60);
            eval.phase = GamePhase::Opening;
            eval.in_opening_theory = true;
            eval.move_number = 8;
            eval
        }
        _ => evaluation(30),
    };
    eval.side = PlayerSide::Black;

    let error = classify(&eval).unwrap().unwrap();
    assert_eq!(error.category, category);
    error
}

#[test]
fn counts_follow_the_classified_errors() {
    let errors = vec![
        judged(ErrorCategory::Tactical),
        judged(ErrorCategory::Tactical),
        judged(ErrorCategory::EndgameTechnique),
        judged(ErrorCategory::Strategic),
    ];
    let result = AnalysisResult::new(errors, 2);

    assert_eq!(result.errors().len(), 4);
    assert_eq!(result.games_analyzed(), 2);
    assert_eq!(result.count_by_severity(ErrorSeverity::Blunder), 3);
    assert_eq!(result.count_by_severity(ErrorSeverity::Mistake), 1);
    assert_eq!(result.count_by_severity(ErrorSeverity::Inaccuracy), 0);
    assert_eq!(
        result.errors_by_category().get(&ErrorCategory::Tactical),
        Some(&2)
    );
    assert_eq!(
        result.errors_by_phase().get(&GamePhase::Endgame),
        Some(&1)
    );
}

#[test]
fn weakest_area_is_the_majority_category() {
    let errors = vec![
        judged(ErrorCategory::Tactical),
        judged(ErrorCategory::Tactical),
        judged(ErrorCategory::Tactical),
        judged(ErrorCategory::Strategic),
    ];
    let result = AnalysisResult::new(errors, 1);
    assert_eq!(result.weakest_area(), Some(ErrorCategory::Tactical));
}

#[test]
fn weakest_area_is_empty_without_errors() {
    let result = AnalysisResult::new(vec![], 0);
    assert_eq!(result.weakest_area(), None);
    assert!(result.is_empty());
}

#[test]
fn weakest_area_ties_resolve_in_declaration_order() {
    let errors = vec![
        judged(ErrorCategory::Strategic),
        judged(ErrorCategory::Strategic),
        judged(ErrorCategory::Tactical),
        judged(ErrorCategory::Tactical),
    ];
    let result = AnalysisResult::new(errors, 1);
    // Tactical is declared before Strategic, so it wins the tie.
    assert_eq!(result.weakest_area(), Some(ErrorCategory::Tactical));
}

#[test]
fn advice_targets_the_weakest_area() {
    let result = AnalysisResult::new(
        vec![judged(ErrorCategory::OpeningKnowledge)],
        1,
    );
    assert!(advice::suggest(&result).contains("openings"));

    let empty = AnalysisResult::new(vec![], 1);
    assert!(advice::suggest(&empty).contains("no critical area"));
}

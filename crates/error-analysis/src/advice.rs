//! Training suggestions derived from the aggregated error profile.

use crate::aggregate::AnalysisResult;
use crate::types::ErrorCategory;

/// One-line training suggestion for the weakest area found in `result`.
pub fn suggest(result: &AnalysisResult) -> String {
    match result.weakest_area() {
        Some(category) => message_for(category).to_string(),
        None => "Great games, no critical area found.".to_string(),
    }
}

fn message_for(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Tactical => {
            "Work on tactical calculation: daily puzzles and analysis of combinations."
        }
        ErrorCategory::OpeningKnowledge => {
            "Review your openings: you are probably leaving theory too early."
        }
        ErrorCategory::EndgameTechnique => {
            "Study basic endgames (king and pawn, rook endings)."
        }
        ErrorCategory::Positional => {
            "Deepen strategic concepts such as weak squares and open files."
        }
        ErrorCategory::TimeManagement => {
            "Manage your clock better: avoid long thinks on forced moves."
        }
        ErrorCategory::Strategic => {
            "Improve medium- and long-term planning."
        }
    }
}

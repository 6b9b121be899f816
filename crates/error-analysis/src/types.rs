//! Domain types for move-error classification.

use chess::Color;

/// Severity tiers, strictly ordered by centipawn loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Inaccuracy,
    Mistake,
    Blunder,
}

impl ErrorSeverity {
    pub const ALL: [ErrorSeverity; 3] = [
        ErrorSeverity::Inaccuracy,
        ErrorSeverity::Mistake,
        ErrorSeverity::Blunder,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ErrorSeverity::Inaccuracy => "INACCURACY",
            ErrorSeverity::Mistake => "MISTAKE",
            ErrorSeverity::Blunder => "BLUNDER",
        }
    }
}

/// Cause categories. Declaration order is the tie-break order used by
/// [`crate::aggregate::AnalysisResult::weakest_area`].
///
/// `TimeManagement` is reserved for a clock-aware extension and is never
/// produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    OpeningKnowledge,
    Tactical,
    EndgameTechnique,
    Positional,
    Strategic,
    TimeManagement,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 6] = [
        ErrorCategory::OpeningKnowledge,
        ErrorCategory::Tactical,
        ErrorCategory::EndgameTechnique,
        ErrorCategory::Positional,
        ErrorCategory::Strategic,
        ErrorCategory::TimeManagement,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ErrorCategory::OpeningKnowledge => "OPENING_KNOWLEDGE",
            ErrorCategory::Tactical => "TACTICAL",
            ErrorCategory::EndgameTechnique => "ENDGAME_TECHNIQUE",
            ErrorCategory::Positional => "POSITIONAL",
            ErrorCategory::Strategic => "STRATEGIC",
            ErrorCategory::TimeManagement => "TIME_MANAGEMENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl GamePhase {
    pub const ALL: [GamePhase; 3] = [
        GamePhase::Opening,
        GamePhase::Middlegame,
        GamePhase::Endgame,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Opening => "OPENING",
            GamePhase::Middlegame => "MIDDLEGAME",
            GamePhase::Endgame => "ENDGAME",
        }
    }
}

/// The side whose moves are being judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlayerSide {
    White,
    Black,
}

impl PlayerSide {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerSide::White => "WHITE",
            PlayerSide::Black => "BLACK",
        }
    }
}

impl From<Color> for PlayerSide {
    fn from(color: Color) -> Self {
        match color {
            Color::White => PlayerSide::White,
            Color::Black => PlayerSide::Black,
        }
    }
}

/// Immutable fact record produced per judged half-move by the evaluation
/// pipeline.
///
/// All evaluations are signed centipawns from the mover's perspective;
/// magnitudes beyond 9000 stand for forced mate. `cp_loss` is non-negative:
/// it is the value surrendered relative to the engine's best move.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMoveEvaluation {
    // Identity
    pub game_id: String,
    /// Fullmove number at the time the move was played.
    pub move_number: u32,
    pub side: PlayerSide,

    // Move data
    pub san: String,
    pub uci: String,
    pub best_move_uci: String,

    // Position data
    pub fen_before: String,
    pub fen_after: String,

    // Evaluation data
    pub eval_before: i32,
    pub eval_after: i32,
    pub best_eval: i32,

    // Derived
    pub cp_loss: i32,
    /// Loss scaled by |material balance|; falls back to the raw loss when
    /// material is level.
    pub relative_cp_loss: f64,

    // Context
    pub legal_moves_before: u32,
    pub forced: bool,
    /// Signed centipawns, positive favors the judged side.
    pub material_balance: i32,
    pub material_delta: i32,
    pub phase: GamePhase,

    // Move features
    pub is_capture: bool,
    pub gives_check: bool,
    pub is_promotion: bool,
    pub mate_threat: bool,

    // Opening context
    pub in_opening_theory: bool,
    pub opening_name: Option<String>,
    pub opening_eco: Option<String>,

    /// Set when the engine returned no usable score for one of the probes
    /// behind this record and a zero was substituted.
    pub low_confidence: bool,
}

/// A judged error: severity and cause plus the evaluation context needed
/// for reporting. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct GameError {
    pub game_id: String,
    pub move_number: u32,
    pub side: PlayerSide,

    pub severity: ErrorSeverity,
    pub category: ErrorCategory,
    pub phase: GamePhase,
    pub cp_loss: i32,

    pub eval_before: i32,
    pub eval_after: i32,
    pub best_eval: i32,

    pub san: String,
    pub uci: String,
    pub best_move_uci: String,

    pub fen_before: String,
    pub fen_after: String,

    pub opening_name: Option<String>,
    pub opening_eco: Option<String>,

    pub low_confidence: bool,
}

impl GameError {
    pub fn from_evaluation(
        eval: &RawMoveEvaluation,
        severity: ErrorSeverity,
        category: ErrorCategory,
    ) -> GameError {
        GameError {
            game_id: eval.game_id.clone(),
            move_number: eval.move_number,
            side: eval.side,
            severity,
            category,
            phase: eval.phase,
            cp_loss: eval.cp_loss,
            eval_before: eval.eval_before,
            eval_after: eval.eval_after,
            best_eval: eval.best_eval,
            san: eval.san.clone(),
            uci: eval.uci.clone(),
            best_move_uci: eval.best_move_uci.clone(),
            fen_before: eval.fen_before.clone(),
            fen_after: eval.fen_after.clone(),
            opening_name: eval.opening_name.clone(),
            opening_eco: eval.opening_eco.clone(),
            low_confidence: eval.low_confidence,
        }
    }
}

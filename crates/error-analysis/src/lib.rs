pub use chess;

pub mod advice;
pub mod aggregate;
pub mod board;
pub mod classify;
pub mod tactics;
pub mod types;

pub use aggregate::AnalysisResult;
pub use classify::{classify, ClassifyError};
pub use types::{
    ErrorCategory, ErrorSeverity, GameError, GamePhase, PlayerSide, RawMoveEvaluation,
};

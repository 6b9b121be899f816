//! Read-only aggregation of judged errors across one or more games.

use std::collections::BTreeMap;

use crate::types::{ErrorCategory, ErrorSeverity, GameError, GamePhase};

/// Immutable view over a finalized list of errors.
///
/// Input order is preserved for indexed access; the distribution maps are
/// built once at construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    errors: Vec<GameError>,
    games_analyzed: usize,
    by_severity: BTreeMap<ErrorSeverity, usize>,
    by_category: BTreeMap<ErrorCategory, usize>,
    by_phase: BTreeMap<GamePhase, usize>,
}

impl AnalysisResult {
    pub fn new(errors: Vec<GameError>, games_analyzed: usize) -> AnalysisResult {
        let mut by_severity = BTreeMap::new();
        let mut by_category = BTreeMap::new();
        let mut by_phase = BTreeMap::new();

        for error in &errors {
            *by_severity.entry(error.severity).or_insert(0) += 1;
            *by_category.entry(error.category).or_insert(0) += 1;
            *by_phase.entry(error.phase).or_insert(0) += 1;
        }

        AnalysisResult {
            errors,
            games_analyzed,
            by_severity,
            by_category,
            by_phase,
        }
    }

    /// All judged errors, in the order they were collected.
    pub fn errors(&self) -> &[GameError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn games_analyzed(&self) -> usize {
        self.games_analyzed
    }

    pub fn count_by_severity(&self, severity: ErrorSeverity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn errors_by_category(&self) -> &BTreeMap<ErrorCategory, usize> {
        &self.by_category
    }

    pub fn errors_by_phase(&self) -> &BTreeMap<GamePhase, usize> {
        &self.by_phase
    }

    /// Mean centipawn loss over all judged errors, 0 when there are none.
    pub fn average_cp_loss(&self) -> f64 {
        if self.errors.is_empty() {
            return 0.0;
        }
        let total: i64 = self.errors.iter().map(|e| e.cp_loss as i64).sum();
        total as f64 / self.errors.len() as f64
    }

    /// The category with the most errors.
    ///
    /// Ties break deterministically on enum declaration order: only a
    /// strictly greater count displaces the current leader, so the lowest
    /// index wins.
    pub fn weakest_area(&self) -> Option<ErrorCategory> {
        let mut leader: Option<(ErrorCategory, usize)> = None;

        for category in ErrorCategory::ALL {
            let count = self.by_category.get(&category).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            match leader {
                Some((_, leading)) if count <= leading => {}
                _ => leader = Some((category, count)),
            }
        }

        leader.map(|(category, _)| category)
    }
}

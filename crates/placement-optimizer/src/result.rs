//! Result interpretation: solver values back to candidates and coverage

use crate::{FacilityCandidate, OptimizationMode, SolverOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Size of the program that was (or would have been) handed to the solver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSize {
    pub debris: usize,
    pub candidates: usize,
    pub variables: usize,
    pub constraints: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveDetails {
    pub problem_size: ProblemSize,
    pub mode: OptimizationMode,
    pub solver: SolverOutcome,
    pub solved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCoverResult {
    pub feasible: bool,
    pub selected_candidates: Vec<String>,
    pub total_cost: f64,
    /// Union of debris covered by the selection over all debris, in [0, 1]
    pub coverage: f64,
    pub covered_count: usize,
    /// Objective as the solver saw it. In max-coverage mode this counts
    /// overlapping debris once per selected candidate.
    pub objective_value: f64,
    pub details: SolveDetails,
}

impl SetCoverResult {
    pub(crate) fn interpret(
        candidates: &[FacilityCandidate],
        debris_count: usize,
        outcome: SolverOutcome,
        mode: OptimizationMode,
        problem_size: ProblemSize,
    ) -> Self {
        let mut selected_candidates = Vec::new();
        let mut total_cost = 0.0;
        let mut covered = vec![false; debris_count];

        if outcome.feasible {
            for candidate in candidates.iter().filter(|c| outcome.value(&c.id) == 1) {
                selected_candidates.push(candidate.id.clone());
                total_cost += candidate.cost;
                for i in candidate.covered_indices() {
                    covered[i] = true;
                }
            }
        }

        let covered_count = covered.iter().filter(|c| **c).count();
        let coverage = if debris_count == 0 {
            1.0
        } else {
            covered_count as f64 / debris_count as f64
        };

        Self {
            feasible: outcome.feasible,
            selected_candidates,
            total_cost,
            coverage,
            covered_count,
            objective_value: outcome.objective,
            details: SolveDetails {
                problem_size,
                mode,
                solver: outcome,
                solved_at: Utc::now(),
            },
        }
    }

    /// Trivial success for an empty debris or candidate list; no solver call
    pub(crate) fn degenerate(debris_count: usize, candidate_count: usize, mode: OptimizationMode) -> Self {
        Self {
            feasible: true,
            selected_candidates: Vec::new(),
            total_cost: 0.0,
            coverage: if debris_count == 0 { 1.0 } else { 0.0 },
            covered_count: 0,
            objective_value: 0.0,
            details: SolveDetails {
                problem_size: ProblemSize {
                    debris: debris_count,
                    candidates: candidate_count,
                    ..Default::default()
                },
                mode,
                solver: SolverOutcome::trivial(),
                solved_at: Utc::now(),
            },
        }
    }

    pub fn is_proven_optimal(&self) -> bool {
        self.details.solver.proven_optimal
    }

    /// Neutral message for the player
    pub fn summary(&self) -> String {
        let size = &self.details.problem_size;
        let mut message = if !self.feasible {
            "No solution found: no combination of facilities satisfies these coverage and budget constraints."
                .to_string()
        } else if size.debris == 0 {
            "No placement needed: there is no active debris to track.".to_string()
        } else if size.candidates == 0 {
            "No improvement possible: no candidate location can cover the current debris.".to_string()
        } else if self.selected_candidates.is_empty() {
            "No improvement possible: no facility fits within the budget.".to_string()
        } else {
            format!(
                "Build {} facilities for {:.0} cost units, covering {} of {} debris ({:.1}%).",
                self.selected_candidates.len(),
                self.total_cost,
                self.covered_count,
                size.debris,
                self.coverage * 100.0
            )
        };

        if !self.is_proven_optimal() {
            message.push_str(" Search limit reached; a better combination may exist.");
        }
        message
    }
}

//! Facility Placement Optimizer
//!
//! Reduces debris-monitoring facility placement to a weighted Set Covering
//! Problem and solves it with an injectable MILP backend.
//!
//! # Formulation
//!
//! ```text
//! minimize   Σ_j c_j·x_j
//! s.t.       Σ_j a_ij·x_j ≥ 1      ∀ i ∈ I   (every debris covered)
//!            Σ_j c_j·x_j ≤ B                (optional budget)
//!            x_j ∈ {0, 1}
//! ```
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | I      | Active debris, indexed by position in the input snapshot |
//! | J      | Facility candidates (ground sites and orbital bands × types) |
//! | c_j    | Construction cost of candidate j (cost units) |
//! | a_ij   | 1 if candidate j covers debris i under the placement rule |
//! | x_j    | 1 if candidate j is built |
//!
//! # Modes
//!
//! 1. Min-cost: the program above, optionally with a partial coverage target
//! 2. Max-coverage: maximize Σ_j |covered(j)|·x_j under the budget. The
//!    objective sums per-candidate counts, so overlapping selections are
//!    counted twice; the reported coverage is the true union.

use debris_coverage::{CoverageError, Debris};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

pub mod candidates;
pub mod config;
pub mod explain;
pub mod export;
pub mod formulation;
pub mod loader;
pub mod model;
pub mod result;
pub mod solver;

pub use candidates::{generate_candidates, CandidateLocation, FacilityCandidate, DEFAULT_CANDIDATE_TYPES};
pub use config::OptimizerConfig;
pub use formulation::{solve_max_coverage, solve_set_cover, FormulationOptions, PartialCoverage, SetCoverProblem};
pub use model::{Bound, Direction, LpModel, ModelError, ModelIssue};
pub use result::{ProblemSize, SetCoverResult, SolveDetails};
pub use solver::{
    sensitivity, solve_weighted_sum, BranchAndBound, MilpSolver, SensitivityPoint, SolverError, SolverOutcome,
    SweepRange,
};

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Coverage(#[from] CoverageError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
    #[error("Candidate {id} has a coverage bitmap of length {actual}, expected {expected}; regenerate candidates for this debris snapshot")]
    StaleCandidate {
        id: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;

/// Which optimization the caller asked for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationMode {
    #[default]
    MinCost,
    MaxCoverage,
}

impl fmt::Display for OptimizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationMode::MinCost => f.write_str("min-cost"),
            OptimizationMode::MaxCoverage => f.write_str("max-coverage"),
        }
    }
}

impl FromStr for OptimizationMode {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "min-cost" | "min_cost" => Ok(OptimizationMode::MinCost),
            "max-coverage" | "max_coverage" => Ok(OptimizationMode::MaxCoverage),
            other => Err(OptimizerError::InvalidParameter(format!("unknown mode {other:?}"))),
        }
    }
}

/// Active debris only, in input order. Bitmap indices refer to this snapshot.
pub fn active_snapshot(debris: &[Debris]) -> Vec<Debris> {
    debris.iter().filter(|d| d.is_active()).cloned().collect()
}

/// Everything one optimization run produced. `candidates[j].coverage[i]`
/// refers to `debris[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRun {
    pub debris: Vec<Debris>,
    pub candidates: Vec<FacilityCandidate>,
    pub result: SetCoverResult,
}

/// Snapshot the active debris, generate candidates and solve in the
/// configured mode with the built-in solver.
pub fn optimize_placement(debris: &[Debris], config: &OptimizerConfig) -> Result<PlacementRun> {
    optimize_placement_with(debris, config, &config.solver())
}

/// As [`optimize_placement`], with a caller-supplied MILP backend
pub fn optimize_placement_with<S: MilpSolver>(
    debris: &[Debris],
    config: &OptimizerConfig,
    solver: &S,
) -> Result<PlacementRun> {
    config.validate()?;

    let snapshot = active_snapshot(debris);
    info!(
        "Optimizing placement ({}) for {} active of {} debris",
        config.mode,
        snapshot.len(),
        debris.len()
    );
    let candidates = generate_candidates(&snapshot, &config.facility_types);

    let result = match config.mode {
        OptimizationMode::MinCost => {
            let problem = SetCoverProblem {
                debris: &snapshot,
                candidates: &candidates,
                budget_limit: config.budget,
                min_coverage: config.min_coverage,
            };
            solve_set_cover(&problem, solver, &config.formulation_options())?
        }
        OptimizationMode::MaxCoverage => {
            let budget = config.budget.ok_or_else(|| {
                OptimizerError::InvalidParameter("max-coverage mode requires a budget".into())
            })?;
            solve_max_coverage(&snapshot, &candidates, budget, solver)?
        }
    };

    Ok(PlacementRun {
        debris: snapshot,
        candidates,
        result,
    })
}

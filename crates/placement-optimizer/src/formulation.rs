//! Set-cover formulation for both optimization modes
//!
//! Row and variable naming in the generated [`LpModel`]:
//!
//! | Name | Kind | Meaning |
//! |------|------|---------|
//! | `cost` | objective (min-cost) | Σ c_j·x_j |
//! | `coverage` | objective (max-coverage) | Σ \|covered(j)\|·x_j |
//! | `budget` | row ≤ B | Σ c_j·x_j |
//! | `debris_{i}` | row ≥ 1, or ≥ 0 with a linking variable | Σ a_ij·x_j |
//! | `covered_{i}` | binary | debris i counts toward the coverage target |
//! | `coverage_target` | row ≥ k | Σ covered_i |
//!
//! Candidate variables are named by candidate id.

use crate::model::{Bound, Direction, LpModel};
use crate::result::{ProblemSize, SetCoverResult};
use crate::solver::MilpSolver;
use crate::{FacilityCandidate, OptimizationMode, OptimizerError, Result};
use debris_coverage::Debris;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const COST: &str = "cost";
pub const COVERAGE: &str = "coverage";
pub const BUDGET: &str = "budget";
pub const COVERAGE_TARGET: &str = "coverage_target";

pub fn debris_row(index: usize) -> String {
    format!("debris_{index}")
}

pub fn covered_variable(index: usize) -> String {
    format!("covered_{index}")
}

/// How a min-cost target below full coverage is modeled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialCoverage {
    /// At least ⌈min_coverage·|I|⌉ debris covered, through linking binaries
    #[default]
    Aggregate,
    /// No coverage rows at all below 100%; only the budget applies
    Unenforced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulationOptions {
    pub partial_coverage: PartialCoverage,
    /// Drop candidates dominated by a cheaper-or-equal superset (min-cost only)
    pub reduce_dominated: bool,
}

impl Default for FormulationOptions {
    fn default() -> Self {
        Self {
            partial_coverage: PartialCoverage::default(),
            reduce_dominated: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetCoverProblem<'a> {
    pub debris: &'a [Debris],
    pub candidates: &'a [FacilityCandidate],
    pub budget_limit: Option<f64>,
    /// Fraction of debris that must be covered; `None` means all
    pub min_coverage: Option<f64>,
}

impl<'a> SetCoverProblem<'a> {
    pub fn new(debris: &'a [Debris], candidates: &'a [FacilityCandidate]) -> Self {
        Self {
            debris,
            candidates,
            budget_limit: None,
            min_coverage: None,
        }
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget_limit = Some(budget);
        self
    }

    pub fn with_min_coverage(mut self, min_coverage: f64) -> Self {
        self.min_coverage = Some(min_coverage);
        self
    }

    /// Number of debris that must be covered, when below all of them
    pub fn coverage_requirement(&self) -> Option<usize> {
        let target = self.min_coverage.filter(|m| *m < 1.0)?;
        Some(required_count(target, self.debris.len()))
    }
}

fn required_count(min_coverage: f64, debris_count: usize) -> usize {
    // tolerance keeps e.g. 0.8 × 5 at 4 rather than 5
    ((min_coverage * debris_count as f64) - 1e-9).ceil().max(0.0) as usize
}

fn check_budget(budget: Option<f64>) -> Result<()> {
    match budget {
        Some(b) if !b.is_finite() || b < 0.0 => Err(OptimizerError::InvalidParameter(format!(
            "budget must be a non-negative number, got {b}"
        ))),
        _ => Ok(()),
    }
}

/// Bitmap lengths and id uniqueness. Only meaningful once there is debris to
/// index into.
fn check_candidates(debris_count: usize, candidates: &[FacilityCandidate]) -> Result<()> {
    let mut ids = HashSet::new();
    for c in candidates {
        if c.coverage.len() != debris_count {
            return Err(OptimizerError::StaleCandidate {
                id: c.id.clone(),
                expected: debris_count,
                actual: c.coverage.len(),
            });
        }
        if !ids.insert(c.id.as_str()) {
            return Err(OptimizerError::InvalidParameter(format!(
                "duplicate candidate id {:?}",
                c.id
            )));
        }
    }
    Ok(())
}

fn check_min_coverage(min_coverage: Option<f64>) -> Result<()> {
    match min_coverage {
        Some(m) if !(0.0..=1.0).contains(&m) => Err(OptimizerError::InvalidParameter(format!(
            "minimum coverage must be within [0, 1], got {m}"
        ))),
        _ => Ok(()),
    }
}

/// Indices of candidates not dominated by another candidate.
///
/// Candidate j is dominated by k when k covers every debris j covers at no
/// greater cost. Exact duplicates keep the earlier candidate.
pub fn undominated(candidates: &[FacilityCandidate]) -> Vec<usize> {
    let covers_all = |k: &FacilityCandidate, j: &FacilityCandidate| {
        j.coverage.iter().zip(&k.coverage).all(|(jc, kc)| !*jc || *kc)
    };

    (0..candidates.len())
        .filter(|&j| {
            let cj = &candidates[j];
            !candidates.iter().enumerate().any(|(k, ck)| {
                k != j
                    && ck.cost <= cj.cost
                    && covers_all(ck, cj)
                    && (ck.cost < cj.cost || ck.coverage != cj.coverage || k < j)
            })
        })
        .collect()
}

/// Min-cost model over the given candidates
pub fn build_min_cost_model(
    problem: &SetCoverProblem<'_>,
    candidates: &[&FacilityCandidate],
    policy: PartialCoverage,
) -> LpModel {
    let n = problem.debris.len();
    let requirement = problem.coverage_requirement();
    let mut model = LpModel::new(COST, Direction::Minimize);

    let with_rows = match requirement {
        None => true,
        Some(k) => policy == PartialCoverage::Aggregate && k > 0,
    };

    for c in candidates {
        let mut coefficients = vec![(COST.to_string(), c.cost)];
        if problem.budget_limit.is_some() {
            coefficients.push((BUDGET.to_string(), c.cost));
        }
        if with_rows {
            coefficients.extend(c.covered_indices().map(|i| (debris_row(i), 1.0)));
        }
        model.add_binary(c.id.clone(), coefficients);
    }

    match requirement {
        None => {
            for i in 0..n {
                model.constrain(debris_row(i), Bound::at_least(1.0));
            }
        }
        Some(k) if with_rows => {
            // only debris some candidate can reach get a linking variable
            let mut reachable = vec![false; n];
            for c in candidates {
                for i in c.covered_indices() {
                    reachable[i] = true;
                }
            }
            for i in (0..n).filter(|i| reachable[*i]) {
                model.add_binary(
                    covered_variable(i),
                    [(debris_row(i), -1.0), (COVERAGE_TARGET.to_string(), 1.0)],
                );
                model.constrain(debris_row(i), Bound::at_least(0.0));
            }
            model.constrain(COVERAGE_TARGET, Bound::at_least(k as f64));
        }
        Some(_) => {
            if policy == PartialCoverage::Unenforced {
                warn!("Coverage target below 100% is not enforced; only the budget constrains the selection");
            }
        }
    }

    if let Some(budget) = problem.budget_limit {
        model.constrain(BUDGET, Bound::at_most(budget));
    }

    model
}

/// Max-coverage model: per-candidate covered counts under the budget
pub fn build_max_coverage_model(candidates: &[FacilityCandidate], budget: f64) -> LpModel {
    let mut model = LpModel::new(COVERAGE, Direction::Maximize);
    for c in candidates {
        model.add_binary(
            c.id.clone(),
            [(COVERAGE, c.covered_count() as f64), (BUDGET, c.cost)],
        );
    }
    model.constrain(BUDGET, Bound::at_most(budget));
    model
}

fn size_of(model: &LpModel, debris: usize, candidates: usize) -> ProblemSize {
    ProblemSize {
        debris,
        candidates,
        variables: model.variables.len(),
        constraints: model.constraints.len(),
    }
}

fn validate(model: &LpModel) -> Result<()> {
    model.validate().map_err(|err| {
        warn!("Refusing to solve: {}", err);
        OptimizerError::Model(err)
    })
}

/// Cheapest set of candidates meeting the coverage requirement within budget.
///
/// Infeasibility is reported through `feasible = false`, not as an error.
pub fn solve_set_cover<S: MilpSolver>(
    problem: &SetCoverProblem<'_>,
    solver: &S,
    options: &FormulationOptions,
) -> Result<SetCoverResult> {
    let n = problem.debris.len();
    check_budget(problem.budget_limit)?;
    check_min_coverage(problem.min_coverage)?;

    if n == 0 || problem.candidates.is_empty() {
        info!(
            "Nothing to optimize ({} debris, {} candidates)",
            n,
            problem.candidates.len()
        );
        return Ok(SetCoverResult::degenerate(n, problem.candidates.len(), OptimizationMode::MinCost));
    }
    check_candidates(n, problem.candidates)?;

    let kept: Vec<&FacilityCandidate> = if options.reduce_dominated {
        undominated(problem.candidates)
            .into_iter()
            .map(|j| &problem.candidates[j])
            .collect()
    } else {
        problem.candidates.iter().collect()
    };
    debug!(
        "{} of {} candidates remain after dominance reduction",
        kept.len(),
        problem.candidates.len()
    );

    let model = build_min_cost_model(problem, &kept, options.partial_coverage);
    validate(&model)?;
    let size = size_of(&model, n, problem.candidates.len());

    info!(
        "Solving min-cost set cover: {} debris, {} candidates, {} variables, {} constraints",
        size.debris, size.candidates, size.variables, size.constraints
    );
    let outcome = solver.solve(&model)?;
    if !outcome.feasible {
        warn!("No feasible placement under the given constraints");
    }

    let result = SetCoverResult::interpret(problem.candidates, n, outcome, OptimizationMode::MinCost, size);
    info!(
        "Selected {} candidates, cost {:.1}, coverage {:.1}%",
        result.selected_candidates.len(),
        result.total_cost,
        result.coverage * 100.0
    );
    Ok(result)
}

/// Candidates maximizing summed per-candidate coverage within `budget`.
///
/// The reported `coverage` is the true union; `objective_value` may be larger
/// when selected candidates overlap.
pub fn solve_max_coverage<S: MilpSolver>(
    debris: &[Debris],
    candidates: &[FacilityCandidate],
    budget: f64,
    solver: &S,
) -> Result<SetCoverResult> {
    let n = debris.len();
    check_budget(Some(budget))?;

    if n == 0 || candidates.is_empty() {
        info!("Nothing to optimize ({} debris, {} candidates)", n, candidates.len());
        return Ok(SetCoverResult::degenerate(n, candidates.len(), OptimizationMode::MaxCoverage));
    }
    check_candidates(n, candidates)?;

    let model = build_max_coverage_model(candidates, budget);
    validate(&model)?;
    let size = size_of(&model, n, candidates.len());

    info!(
        "Solving max-coverage: {} debris, {} candidates, budget {:.1}",
        n,
        candidates.len(),
        budget
    );
    let outcome = solver.solve(&model)?;
    if !outcome.feasible {
        warn!("Solver found no feasible selection");
    }

    let result = SetCoverResult::interpret(candidates, n, outcome, OptimizationMode::MaxCoverage, size);
    info!(
        "Selected {} candidates, cost {:.1}, coverage {:.1}% (objective {})",
        result.selected_candidates.len(),
        result.total_cost,
        result.coverage * 100.0,
        result.objective_value
    );
    Ok(result)
}

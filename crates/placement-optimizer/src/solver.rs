//! MILP solver strategy and the built-in binary branch-and-bound backend
//!
//! Any backend can be plugged in through [`MilpSolver`]. The bundled
//! [`BranchAndBound`] solves pure binary programs exactly:
//!
//! - depth-first search, variables with a non-zero objective branched first
//! - unit propagation on every touched row (a variable whose value is forced
//!   by a row's remaining slack is fixed immediately)
//! - pruning with the best single-row LP relaxation (fractional knapsack /
//!   fractional cover, solved greedily by ratio)
//!
//! The search stops after `node_limit` nodes and reports the incumbent with
//! `proven_optimal = false`.

use crate::model::{Direction, LpModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_NODE_LIMIT: u64 = 5_000_000;

const TOLERANCE: f64 = 1e-7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Variable {0:?} is not binary; this backend solves pure binary programs")]
    NonBinaryVariable(String),
    #[error("Backend failure: {0}")]
    Backend(String),
    #[error("Unknown variable {0:?}")]
    UnknownVariable(String),
    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),
}

/// What the solver reports back: feasibility flags plus a 0/1 value per variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverOutcome {
    pub feasible: bool,
    pub bounded: bool,
    /// False when the search stopped at its node limit
    pub proven_optimal: bool,
    /// Objective value in the model's own direction
    pub objective: f64,
    pub values: BTreeMap<String, u8>,
    pub nodes_explored: u64,
}

impl SolverOutcome {
    /// Outcome of an empty problem that needed no search
    pub fn trivial() -> Self {
        Self {
            feasible: true,
            bounded: true,
            proven_optimal: true,
            objective: 0.0,
            values: BTreeMap::new(),
            nodes_explored: 0,
        }
    }

    fn infeasible(proven: bool, nodes: u64) -> Self {
        Self {
            feasible: false,
            bounded: true,
            proven_optimal: proven,
            objective: 0.0,
            values: BTreeMap::new(),
            nodes_explored: nodes,
        }
    }

    pub fn value(&self, variable: &str) -> u8 {
        self.values.get(variable).copied().unwrap_or(0)
    }
}

pub trait MilpSolver {
    fn solve(&self, model: &LpModel) -> Result<SolverOutcome, SolverError>;
}

impl<S: MilpSolver + ?Sized> MilpSolver for &S {
    fn solve(&self, model: &LpModel) -> Result<SolverOutcome, SolverError> {
        (**self).solve(model)
    }
}

impl<S: MilpSolver + ?Sized> MilpSolver for Box<S> {
    fn solve(&self, model: &LpModel) -> Result<SolverOutcome, SolverError> {
        (**self).solve(model)
    }
}

/// Name of the combined objective built by [`solve_weighted_sum`]
pub const WEIGHTED_SUM: &str = "weighted_sum";

/// Solve with the objective replaced by a weighted sum of attributes
pub fn solve_weighted_sum<S: MilpSolver>(
    model: &LpModel,
    weights: &BTreeMap<String, f64>,
    solver: &S,
) -> Result<SolverOutcome, SolverError> {
    if let Some((name, _)) = weights.iter().find(|(_, w)| !w.is_finite()) {
        return Err(SolverError::InvalidSweep(format!("weight for {name:?} is not finite")));
    }
    solver.solve(&model.weighted_sum(WEIGHTED_SUM, weights))
}

/// Inclusive range of objective coefficients to sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SweepRange {
    fn points(&self) -> Result<Vec<f64>, SolverError> {
        let finite = self.min.is_finite() && self.max.is_finite() && self.step.is_finite();
        if !finite || self.step <= 0.0 || self.max < self.min {
            return Err(SolverError::InvalidSweep(format!(
                "need finite min <= max and step > 0, got {:?}",
                self
            )));
        }
        // integer stepping so rounding never drops the last point
        let steps = ((self.max - self.min) / self.step + 1e-9).floor() as u64;
        Ok((0..=steps).map(|k| self.min + k as f64 * self.step).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    pub coefficient: f64,
    pub objective: f64,
    pub values: BTreeMap<String, u8>,
}

/// Re-solve with `variable`'s objective coefficient set to each point of
/// `range`. Infeasible points are left out.
pub fn sensitivity<S: MilpSolver>(
    model: &LpModel,
    solver: &S,
    variable: &str,
    range: SweepRange,
) -> Result<Vec<SensitivityPoint>, SolverError> {
    if !model.variables.contains_key(variable) {
        return Err(SolverError::UnknownVariable(variable.to_string()));
    }

    let mut points = Vec::new();
    for coefficient in range.points()? {
        let outcome = solver.solve(&model.with_objective_coefficient(variable, coefficient))?;
        if outcome.feasible {
            points.push(SensitivityPoint {
                coefficient,
                objective: outcome.objective,
                values: outcome.values,
            });
        }
    }
    debug!("Sensitivity of {:?}: {} feasible points", variable, points.len());
    Ok(points)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchAndBound {
    pub node_limit: u64,
}

impl Default for BranchAndBound {
    fn default() -> Self {
        Self {
            node_limit: DEFAULT_NODE_LIMIT,
        }
    }
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_limit(node_limit: u64) -> Self {
        Self { node_limit }
    }
}

impl MilpSolver for BranchAndBound {
    fn solve(&self, model: &LpModel) -> Result<SolverOutcome, SolverError> {
        if let Some(name) = model.variables.keys().find(|v| !model.binaries.contains(*v)) {
            return Err(SolverError::NonBinaryVariable(name.clone()));
        }

        let sense = match model.op_type {
            Direction::Minimize => 1.0,
            Direction::Maximize => -1.0,
        };

        let mut search = Search::new(model, sense, self.node_limit);
        let all_rows: Vec<usize> = (0..search.rows.len()).collect();
        if !search.propagate(all_rows) {
            debug!("Branch-and-bound: infeasible at root");
            return Ok(SolverOutcome::infeasible(true, 0));
        }
        search.dfs(0);

        debug!(
            "Branch-and-bound: {} variables, {} rows, {} nodes, exhausted={}",
            search.vars.len(),
            search.rows.len(),
            search.nodes,
            search.exhausted
        );

        let proven = !search.exhausted;
        Ok(match search.best {
            None => SolverOutcome::infeasible(proven, search.nodes),
            Some((cost, assignment)) => SolverOutcome {
                feasible: true,
                bounded: true,
                proven_optimal: proven,
                objective: sense * cost,
                values: search
                    .vars
                    .iter()
                    .zip(assignment)
                    .map(|(v, x)| (v.name.clone(), x))
                    .collect(),
                nodes_explored: search.nodes,
            },
        })
    }
}

struct Var {
    name: String,
    /// Objective coefficient, sign-normalized so the search always minimizes
    objective: f64,
    entries: Vec<(usize, f64)>,
}

struct Row {
    lo: f64,
    hi: f64,
    activity: f64,
    /// Sum of positive coefficients over open variables
    open_pos: f64,
    /// Sum of negative coefficients over open variables
    open_neg: f64,
    max_abs: f64,
    entries: Vec<(usize, f64)>,
}

impl Row {
    fn feasible(&self) -> bool {
        self.activity + self.open_pos >= self.lo - TOLERANCE
            && self.activity + self.open_neg <= self.hi + TOLERANCE
    }
}

struct Search {
    vars: Vec<Var>,
    rows: Vec<Row>,
    value: Vec<Option<u8>>,
    trail: Vec<usize>,
    current: f64,
    /// Sum of negative objective coefficients over open variables
    open_negative: f64,
    best: Option<(f64, Vec<u8>)>,
    nodes: u64,
    node_limit: u64,
    exhausted: bool,
}

impl Search {
    fn new(model: &LpModel, sense: f64, node_limit: u64) -> Self {
        let row_index: BTreeMap<&str, usize> = model
            .constraints
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut vars: Vec<Var> = model
            .variables
            .iter()
            .map(|(name, coefficients)| Var {
                name: name.clone(),
                objective: sense * coefficients.get(&model.optimize).copied().unwrap_or(0.0),
                entries: coefficients
                    .iter()
                    .filter(|(_, a)| **a != 0.0)
                    .filter_map(|(attr, a)| row_index.get(attr.as_str()).map(|r| (*r, *a)))
                    .collect(),
            })
            .collect();

        // Objective-carrying variables first, most attractive first; auxiliary
        // (zero-objective) variables last so propagation settles them.
        vars.sort_by(|a, b| {
            (a.objective == 0.0)
                .cmp(&(b.objective == 0.0))
                .then(a.objective.total_cmp(&b.objective))
        });

        let mut rows: Vec<Row> = model
            .constraints
            .values()
            .map(|bound| Row {
                lo: bound.lower(),
                hi: bound.upper(),
                activity: 0.0,
                open_pos: 0.0,
                open_neg: 0.0,
                max_abs: 0.0,
                entries: Vec::new(),
            })
            .collect();

        for (j, var) in vars.iter().enumerate() {
            for &(r, a) in &var.entries {
                let row = &mut rows[r];
                if a > 0.0 {
                    row.open_pos += a;
                } else {
                    row.open_neg += a;
                }
                row.max_abs = row.max_abs.max(a.abs());
                row.entries.push((j, a));
            }
        }

        let open_negative = vars.iter().map(|v| v.objective.min(0.0)).sum();
        let n = vars.len();

        Self {
            vars,
            rows,
            value: vec![None; n],
            trail: Vec::with_capacity(n),
            current: 0.0,
            open_negative,
            best: None,
            nodes: 0,
            node_limit,
            exhausted: false,
        }
    }

    fn fix(&mut self, j: usize, v: u8) {
        self.value[j] = Some(v);
        self.trail.push(j);
        let var = &self.vars[j];
        self.open_negative -= var.objective.min(0.0);
        self.current += var.objective * f64::from(v);
        for &(r, a) in &var.entries {
            let row = &mut self.rows[r];
            if a > 0.0 {
                row.open_pos -= a;
            } else {
                row.open_neg -= a;
            }
            if v == 1 {
                row.activity += a;
            }
        }
    }

    fn unfix_last(&mut self) {
        let Some(j) = self.trail.pop() else {
            return;
        };
        let Some(v) = self.value[j].take() else {
            return;
        };
        let var = &self.vars[j];
        self.open_negative += var.objective.min(0.0);
        self.current -= var.objective * f64::from(v);
        for &(r, a) in &var.entries {
            let row = &mut self.rows[r];
            if a > 0.0 {
                row.open_pos += a;
            } else {
                row.open_neg += a;
            }
            if v == 1 {
                row.activity -= a;
            }
        }
    }

    fn unwind(&mut self, mark: usize) {
        while self.trail.len() > mark {
            self.unfix_last();
        }
    }

    /// Values forced on open variables of row `r` by its remaining slack
    fn implications(&self, r: usize) -> Vec<(usize, u8)> {
        let row = &self.rows[r];
        let lo_slack = row.activity + row.open_pos - row.lo;
        let hi_slack = row.hi - (row.activity + row.open_neg);
        if lo_slack >= row.max_abs + TOLERANCE && hi_slack >= row.max_abs + TOLERANCE {
            return Vec::new();
        }

        let mut forced = Vec::new();
        for &(x, a) in &row.entries {
            if self.value[x].is_some() {
                continue;
            }
            if a > 0.0 {
                if a > lo_slack + TOLERANCE {
                    forced.push((x, 1));
                }
                if a > hi_slack + TOLERANCE {
                    forced.push((x, 0));
                }
            } else {
                if -a > lo_slack + TOLERANCE {
                    forced.push((x, 0));
                }
                if -a > hi_slack + TOLERANCE {
                    forced.push((x, 1));
                }
            }
        }
        forced
    }

    /// Check rows and apply forced values until a fixpoint. False on conflict;
    /// the caller unwinds the trail either way.
    fn propagate(&mut self, mut queue: Vec<usize>) -> bool {
        while let Some(r) = queue.pop() {
            if !self.rows[r].feasible() {
                return false;
            }
            for (x, v) in self.implications(r) {
                match self.value[x] {
                    Some(existing) if existing != v => return false,
                    Some(_) => {}
                    None => {
                        self.fix(x, v);
                        queue.extend(self.vars[x].entries.iter().map(|(row, _)| *row));
                    }
                }
            }
        }
        true
    }

    fn lower_bound(&self) -> f64 {
        let simple = self.current + self.open_negative;
        let mut bound = simple;
        for row in &self.rows {
            if row.lo.is_finite() {
                bound = bound.max(simple + self.cover_extra(row));
            }
            if row.hi.is_finite() {
                bound = bound.max(self.packing_bound(row, simple));
            }
            if bound == f64::INFINITY {
                break;
            }
        }
        bound
    }

    /// Minimum extra cost to lift the row to its lower bound, from the LP
    /// relaxation of that row alone. Zero when the row has open negative
    /// coefficients.
    fn cover_extra(&self, row: &Row) -> f64 {
        let mut need = row.lo - row.activity;
        if need <= TOLERANCE {
            return 0.0;
        }
        let mut items = Vec::new();
        for &(x, a) in &row.entries {
            if self.value[x].is_some() {
                continue;
            }
            if a < 0.0 {
                return 0.0;
            }
            let g = self.vars[x].objective;
            if g < 0.0 {
                // already taken in the simple bound
                need -= a;
            } else {
                items.push((g, a));
            }
        }
        if need <= TOLERANCE {
            return 0.0;
        }

        items.sort_by(|p, q| (p.0 / p.1).total_cmp(&(q.0 / q.1)));
        let mut extra = 0.0;
        for (g, a) in items {
            if need <= TOLERANCE {
                break;
            }
            let take = (need / a).min(1.0);
            extra += g * take;
            need -= a * take;
        }
        if need > TOLERANCE {
            f64::INFINITY
        } else {
            extra
        }
    }

    /// Simple bound with the row's attractive variables refilled fractionally
    /// up to the row's remaining capacity.
    fn packing_bound(&self, row: &Row, simple: f64) -> f64 {
        let mut capacity = row.hi - row.activity;
        let mut removed = 0.0;
        let mut items = Vec::new();
        for &(x, a) in &row.entries {
            if self.value[x].is_some() {
                continue;
            }
            if a < 0.0 {
                return simple;
            }
            let g = self.vars[x].objective;
            if g < 0.0 {
                removed += g;
                items.push((g, a));
            }
        }

        items.sort_by(|p, q| (-q.0 / q.1).total_cmp(&(-p.0 / p.1)));
        let mut gain = 0.0;
        for (g, a) in items {
            if capacity <= TOLERANCE {
                break;
            }
            let take = (capacity / a).min(1.0);
            gain += g * take;
            capacity -= a * take;
        }
        simple - removed + gain
    }

    fn dfs(&mut self, from: usize) {
        if self.exhausted {
            return;
        }
        self.nodes += 1;
        if self.nodes > self.node_limit {
            self.exhausted = true;
            return;
        }

        if let Some((best, _)) = &self.best {
            if self.lower_bound() >= *best - TOLERANCE {
                return;
            }
        }

        let Some(j) = (from..self.vars.len()).find(|&j| self.value[j].is_none()) else {
            self.record_incumbent();
            return;
        };

        let first = if self.vars[j].objective < 0.0 { 1 } else { 0 };
        for v in [first, 1 - first] {
            let mark = self.trail.len();
            self.fix(j, v);
            let touched: Vec<usize> = self.vars[j].entries.iter().map(|(r, _)| *r).collect();
            if self.propagate(touched) {
                self.dfs(j + 1);
            }
            self.unwind(mark);
            if self.exhausted {
                return;
            }
        }
    }

    fn record_incumbent(&mut self) {
        let improves = match &self.best {
            Some((best, _)) => self.current < *best - TOLERANCE,
            None => true,
        };
        if improves {
            let assignment = self.value.iter().map(|v| v.unwrap_or(0)).collect();
            self.best = Some((self.current, assignment));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bound;

    fn brute_force(model: &LpModel) -> Option<f64> {
        let names: Vec<&String> = model.variables.keys().collect();
        let mut best: Option<f64> = None;
        for mask in 0u32..(1 << names.len()) {
            let values: BTreeMap<String, u8> = names
                .iter()
                .enumerate()
                .map(|(i, n)| ((*n).clone(), ((mask >> i) & 1) as u8))
                .collect();
            if !model.is_satisfied_by(&values, 1e-9) {
                continue;
            }
            let obj = model.objective_value(&values);
            best = Some(match (best, model.op_type) {
                (None, _) => obj,
                (Some(b), Direction::Minimize) => b.min(obj),
                (Some(b), Direction::Maximize) => b.max(obj),
            });
        }
        best
    }

    /// Small deterministic generator so the comparison cases are reproducible
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            self.0 >> 33
        }

        fn below(&mut self, n: u64) -> u64 {
            self.next() % n
        }
    }

    #[test]
    fn test_knapsack_optimum() {
        let mut model = LpModel::new("value", Direction::Maximize);
        model.add_binary("a", [("value", 10.0), ("weight", 5.0)]);
        model.add_binary("b", [("value", 40.0), ("weight", 4.0)]);
        model.add_binary("c", [("value", 30.0), ("weight", 6.0)]);
        model.add_binary("d", [("value", 50.0), ("weight", 3.0)]);
        model.constrain("weight", Bound::at_most(10.0));

        let outcome = BranchAndBound::new().solve(&model).unwrap();
        assert!(outcome.feasible);
        assert!(outcome.proven_optimal);
        assert_eq!(outcome.objective, 90.0);
        assert_eq!(outcome.value("b"), 1);
        assert_eq!(outcome.value("d"), 1);
        assert_eq!(outcome.value("a"), 0);
    }

    #[test]
    fn test_set_cover_optimum() {
        // Universe {0,1,2,3}; cheapest cover is s1 + s3 at cost 5
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("s1", [("cost", 3.0), ("e0", 1.0), ("e1", 1.0)]);
        model.add_binary("s2", [("cost", 2.0), ("e1", 1.0), ("e2", 1.0)]);
        model.add_binary("s3", [("cost", 2.0), ("e2", 1.0), ("e3", 1.0)]);
        model.add_binary("s4", [("cost", 5.0), ("e0", 1.0), ("e3", 1.0)]);
        for e in ["e0", "e1", "e2", "e3"] {
            model.constrain(e, Bound::at_least(1.0));
        }

        let outcome = BranchAndBound::new().solve(&model).unwrap();
        assert_eq!(outcome.objective, 5.0);
        assert_eq!(outcome.value("s1"), 1);
        assert_eq!(outcome.value("s3"), 1);
        assert!(model.is_satisfied_by(&outcome.values, 1e-9));
    }

    #[test]
    fn test_uncoverable_row_is_infeasible() {
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("x", [("cost", 1.0), ("e0", 1.0)]);
        model.constrain("e0", Bound::at_least(1.0));
        model.constrain("e1", Bound::at_least(1.0));

        let outcome = BranchAndBound::new().solve(&model).unwrap();
        assert!(!outcome.feasible);
        assert!(outcome.proven_optimal);
        assert!(outcome.values.is_empty());
    }

    #[test]
    fn test_equality_row() {
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("a", [("cost", 1.0), ("pick", 1.0)]);
        model.add_binary("b", [("cost", 2.0), ("pick", 1.0)]);
        model.add_binary("c", [("cost", 3.0), ("pick", 1.0)]);
        model.constrain("pick", Bound::exactly(2.0));

        let outcome = BranchAndBound::new().solve(&model).unwrap();
        assert_eq!(outcome.objective, 3.0);
    }

    #[test]
    fn test_negative_coefficients_link_rows() {
        // y may only be 1 if x is 1; need y = 1
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("x", [("cost", 4.0), ("link", 1.0)]);
        model.add_binary("y", [("link", -1.0), ("target", 1.0)]);
        model.constrain("link", Bound::at_least(0.0));
        model.constrain("target", Bound::at_least(1.0));

        let outcome = BranchAndBound::new().solve(&model).unwrap();
        assert!(outcome.feasible);
        assert_eq!(outcome.value("x"), 1);
        assert_eq!(outcome.value("y"), 1);
        assert_eq!(outcome.objective, 4.0);
    }

    #[test]
    fn test_rejects_non_binary_variable() {
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.variables.insert("z".into(), BTreeMap::from([("cost".to_string(), 1.0)]));
        assert_eq!(
            BranchAndBound::new().solve(&model),
            Err(SolverError::NonBinaryVariable("z".into()))
        );
    }

    #[test]
    fn test_weighted_sum_trades_off_objectives() {
        // one slot; "a" is cheap and short-lived, "b" pricey and durable
        let mut model = LpModel::new("cost", Direction::Maximize);
        model.add_binary("a", [("cost", 10.0), ("life", 1.0), ("slot", 1.0)]);
        model.add_binary("b", [("cost", 30.0), ("life", 10.0), ("slot", 1.0)]);
        model.constrain("slot", Bound::at_most(1.0));

        let weights = BTreeMap::from([("cost".to_string(), -1.0), ("life".to_string(), 5.0)]);
        let outcome = solve_weighted_sum(&model, &weights, &BranchAndBound::new()).unwrap();
        assert_eq!(outcome.value("b"), 1);
        assert_eq!(outcome.objective, 20.0);

        let weights = BTreeMap::from([("cost".to_string(), -1.0), ("life".to_string(), 1.0)]);
        let outcome = solve_weighted_sum(&model, &weights, &BranchAndBound::new()).unwrap();
        assert!(outcome.values.values().all(|v| *v == 0));
        assert_eq!(outcome.objective, 0.0);

        let bad = BTreeMap::from([("cost".to_string(), f64::NAN)]);
        assert!(matches!(
            solve_weighted_sum(&model, &bad, &BranchAndBound::new()),
            Err(SolverError::InvalidSweep(_))
        ));
    }

    #[test]
    fn test_sensitivity_tracks_switch_point() {
        // cover e0 with either a (swept) or b (cost 5)
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("a", [("cost", 1.0), ("e0", 1.0)]);
        model.add_binary("b", [("cost", 5.0), ("e0", 1.0)]);
        model.constrain("e0", Bound::at_least(1.0));

        let range = SweepRange { min: 2.0, max: 8.0, step: 2.0 };
        let points = sensitivity(&model, &BranchAndBound::new(), "a", range).unwrap();
        let coefficients: Vec<f64> = points.iter().map(|p| p.coefficient).collect();
        assert_eq!(coefficients, vec![2.0, 4.0, 6.0, 8.0]);
        let objectives: Vec<f64> = points.iter().map(|p| p.objective).collect();
        assert_eq!(objectives, vec![2.0, 4.0, 5.0, 5.0]);
        assert_eq!(points[1].values["a"], 1);
        assert_eq!(points[2].values["b"], 1);
        assert_eq!(points[2].values["a"], 0);
    }

    #[test]
    fn test_sensitivity_rejects_bad_input() {
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("a", [("cost", 1.0)]);
        let solver = BranchAndBound::new();
        let range = SweepRange { min: 0.0, max: 1.0, step: 0.5 };

        assert_eq!(
            sensitivity(&model, &solver, "zz", range),
            Err(SolverError::UnknownVariable("zz".into()))
        );
        let zero_step = SweepRange { step: 0.0, ..range };
        assert!(matches!(
            sensitivity(&model, &solver, "a", zero_step),
            Err(SolverError::InvalidSweep(_))
        ));
    }

    #[test]
    fn test_sensitivity_skips_infeasible_points() {
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("a", [("cost", 1.0), ("e0", 1.0)]);
        model.constrain("e0", Bound::at_least(2.0));
        let range = SweepRange { min: 0.0, max: 1.0, step: 0.25 };
        assert!(sensitivity(&model, &BranchAndBound::new(), "a", range).unwrap().is_empty());
    }

    #[test]
    fn test_node_limit_is_reported() {
        let mut model = LpModel::new("value", Direction::Maximize);
        for i in 0..12 {
            model.add_binary(format!("v{i}"), [("value", 1.0 + i as f64), ("weight", 2.0 + (i % 5) as f64)]);
        }
        model.constrain("weight", Bound::at_most(11.0));

        let outcome = BranchAndBound::with_node_limit(2).solve(&model).unwrap();
        assert!(!outcome.proven_optimal);
        assert!(outcome.nodes_explored <= 3);
    }

    #[test]
    fn test_matches_brute_force_on_random_covers() {
        let mut rng = Lcg(0x5eed);
        for case in 0..40 {
            let n_sets = 2 + rng.below(9) as usize;
            let n_elems = 1 + rng.below(8) as usize;
            let mut model = LpModel::new("cost", Direction::Minimize);
            for j in 0..n_sets {
                let mut coefficients = vec![("cost".to_string(), 1.0 + rng.below(20) as f64)];
                for i in 0..n_elems {
                    if rng.below(3) == 0 {
                        coefficients.push((format!("e{i}"), 1.0));
                    }
                }
                model.add_binary(format!("s{j}"), coefficients);
            }
            for i in 0..n_elems {
                model.constrain(format!("e{i}"), Bound::at_least(1.0));
            }
            if rng.below(2) == 0 {
                let budget = 10.0 + rng.below(40) as f64;
                for (_, coefficients) in model.variables.iter_mut() {
                    let cost = coefficients["cost"];
                    coefficients.insert("budget".to_string(), cost);
                }
                model.constrain("budget", Bound::at_most(budget));
            }

            let outcome = BranchAndBound::new().solve(&model).unwrap();
            match brute_force(&model) {
                Some(best) => {
                    assert!(outcome.feasible, "case {case}");
                    assert!((outcome.objective - best).abs() < 1e-9, "case {case}");
                    assert!(model.is_satisfied_by(&outcome.values, 1e-9), "case {case}");
                }
                None => assert!(!outcome.feasible, "case {case}"),
            }
        }
    }

    #[test]
    fn test_matches_brute_force_on_random_knapsacks() {
        let mut rng = Lcg(42);
        for case in 0..40 {
            let n = 1 + rng.below(11) as usize;
            let mut model = LpModel::new("coverage", Direction::Maximize);
            for j in 0..n {
                model.add_binary(
                    format!("c{j}"),
                    [("coverage", rng.below(10) as f64), ("budget", 1.0 + rng.below(15) as f64)],
                );
            }
            model.constrain("budget", Bound::at_most(rng.below(40) as f64));

            let outcome = BranchAndBound::new().solve(&model).unwrap();
            let best = brute_force(&model).expect("empty selection is always feasible");
            assert!(outcome.feasible, "case {case}");
            assert!((outcome.objective - best).abs() < 1e-9, "case {case}");
        }
    }
}

//! Linear program model handed to the MILP backend
//!
//! Variables carry a map of attribute → coefficient. One attribute is the
//! objective (`optimize`); every other attribute that names a constraint
//! contributes to that constraint's row.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "min")]
    Minimize,
    #[serde(rename = "max")]
    Maximize,
}

/// Row bounds. At least one of the three must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal: Option<f64>,
}

impl Bound {
    pub fn at_least(min: f64) -> Self {
        Self { min: Some(min), ..Default::default() }
    }

    pub fn at_most(max: f64) -> Self {
        Self { max: Some(max), ..Default::default() }
    }

    pub fn exactly(value: f64) -> Self {
        Self { equal: Some(value), ..Default::default() }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.equal.is_none()
    }

    /// Effective lower bound (−∞ when absent)
    pub fn lower(&self) -> f64 {
        match (self.min, self.equal) {
            (Some(m), Some(e)) => m.max(e),
            (Some(m), None) => m,
            (None, Some(e)) => e,
            (None, None) => f64::NEG_INFINITY,
        }
    }

    /// Effective upper bound (+∞ when absent)
    pub fn upper(&self) -> f64 {
        match (self.max, self.equal) {
            (Some(m), Some(e)) => m.min(e),
            (Some(m), None) => m,
            (None, Some(e)) => e,
            (None, None) => f64::INFINITY,
        }
    }

    pub fn admits(&self, activity: f64, tolerance: f64) -> bool {
        activity >= self.lower() - tolerance && activity <= self.upper() + tolerance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpModel {
    /// Name of the objective attribute
    pub optimize: String,
    pub op_type: Direction,
    pub constraints: BTreeMap<String, Bound>,
    pub variables: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub binaries: BTreeSet<String>,
}

impl LpModel {
    pub fn new(objective: impl Into<String>, direction: Direction) -> Self {
        Self {
            optimize: objective.into(),
            op_type: direction,
            constraints: BTreeMap::new(),
            variables: BTreeMap::new(),
            binaries: BTreeSet::new(),
        }
    }

    /// Add a binary decision variable with its attribute coefficients
    pub fn add_binary<I, K>(&mut self, name: impl Into<String>, coefficients: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let name = name.into();
        let coefficients = coefficients.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.binaries.insert(name.clone());
        self.variables.insert(name, coefficients);
    }

    pub fn constrain(&mut self, name: impl Into<String>, bound: Bound) {
        self.constraints.insert(name.into(), bound);
    }

    pub fn coefficient(&self, variable: &str, attribute: &str) -> f64 {
        self.variables
            .get(variable)
            .and_then(|c| c.get(attribute))
            .copied()
            .unwrap_or(0.0)
    }

    /// Row activity of `attribute` under a 0/1 assignment
    pub fn activity(&self, attribute: &str, values: &BTreeMap<String, u8>) -> f64 {
        values
            .iter()
            .filter(|(_, v)| **v == 1)
            .map(|(name, _)| self.coefficient(name, attribute))
            .sum()
    }

    pub fn objective_value(&self, values: &BTreeMap<String, u8>) -> f64 {
        self.activity(&self.optimize, values)
    }

    /// Whether every constraint admits the assignment
    pub fn is_satisfied_by(&self, values: &BTreeMap<String, u8>, tolerance: f64) -> bool {
        self.constraints
            .iter()
            .all(|(name, bound)| bound.admits(self.activity(name, values), tolerance))
    }

    /// Copy of the model whose objective is `Σ weight·attribute` over the
    /// given attributes, stored as a new `objective` attribute on every
    /// variable. Existing coefficients and constraints are untouched.
    pub fn weighted_sum(&self, objective: &str, weights: &BTreeMap<String, f64>) -> LpModel {
        let mut model = self.clone();
        model.optimize = objective.to_string();
        for coefficients in model.variables.values_mut() {
            let combined = weights
                .iter()
                .filter_map(|(attribute, weight)| coefficients.get(attribute).map(|c| c * weight))
                .sum();
            coefficients.insert(objective.to_string(), combined);
        }
        model
    }

    /// Copy of the model with `variable`'s objective coefficient replaced
    pub fn with_objective_coefficient(&self, variable: &str, value: f64) -> LpModel {
        let mut model = self.clone();
        if let Some(coefficients) = model.variables.get_mut(variable) {
            coefficients.insert(model.optimize.clone(), value);
        }
        model
    }

    /// Structural checks run before any solve. Every issue found is reported.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut issues = Vec::new();

        if self.optimize.trim().is_empty() {
            issues.push(ModelIssue::MissingObjective);
        }

        if self.variables.is_empty() {
            issues.push(ModelIssue::NoVariables);
        }

        for (name, bound) in &self.constraints {
            if bound.is_unbounded() {
                issues.push(ModelIssue::UnboundedConstraint(name.clone()));
                continue;
            }
            let values = [bound.min, bound.max, bound.equal];
            if values.iter().flatten().any(|v| !v.is_finite()) {
                issues.push(ModelIssue::NonFiniteBound(name.clone()));
            } else if bound.lower() > bound.upper() {
                issues.push(ModelIssue::InconsistentBounds(name.clone()));
            }
        }

        for (variable, coefficients) in &self.variables {
            for (attribute, value) in coefficients {
                if !value.is_finite() {
                    issues.push(ModelIssue::NonFiniteCoefficient {
                        variable: variable.clone(),
                        attribute: attribute.clone(),
                    });
                }
            }
        }

        let has_objective_term = self
            .variables
            .values()
            .any(|c| c.contains_key(&self.optimize));
        if !self.variables.is_empty() && !has_objective_term {
            issues.push(ModelIssue::NoObjectiveCoefficient(self.optimize.clone()));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ModelError { issues })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelIssue {
    MissingObjective,
    NoVariables,
    UnboundedConstraint(String),
    NonFiniteBound(String),
    InconsistentBounds(String),
    NonFiniteCoefficient { variable: String, attribute: String },
    NoObjectiveCoefficient(String),
}

impl fmt::Display for ModelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelIssue::MissingObjective => write!(f, "no objective attribute"),
            ModelIssue::NoVariables => write!(f, "no variables defined"),
            ModelIssue::UnboundedConstraint(c) => write!(f, "constraint {c:?} has no bound"),
            ModelIssue::NonFiniteBound(c) => write!(f, "constraint {c:?} has a non-finite bound"),
            ModelIssue::InconsistentBounds(c) => write!(f, "constraint {c:?} has min above max"),
            ModelIssue::NonFiniteCoefficient { variable, attribute } => {
                write!(f, "variable {variable:?} has a non-finite {attribute:?} coefficient")
            }
            ModelIssue::NoObjectiveCoefficient(o) => {
                write!(f, "no variable has a coefficient for objective {o:?}")
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid model: {}", join_issues(.issues))]
pub struct ModelError {
    pub issues: Vec<ModelIssue>,
}

fn join_issues(issues: &[ModelIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knapsack() -> LpModel {
        let mut model = LpModel::new("value", Direction::Maximize);
        model.add_binary("a", [("value", 3.0), ("weight", 2.0)]);
        model.add_binary("b", [("value", 4.0), ("weight", 3.0)]);
        model.constrain("weight", Bound::at_most(4.0));
        model
    }

    #[test]
    fn test_valid_model_passes() {
        assert_eq!(knapsack().validate(), Ok(()));
    }

    #[test]
    fn test_reports_every_issue() {
        let mut model = LpModel::new("", Direction::Minimize);
        model.constrain("loose", Bound::default());
        model.constrain("backwards", Bound { min: Some(3.0), max: Some(1.0), equal: None });

        let err = model.validate().unwrap_err();
        assert!(err.issues.contains(&ModelIssue::MissingObjective));
        assert!(err.issues.contains(&ModelIssue::NoVariables));
        assert!(err.issues.contains(&ModelIssue::UnboundedConstraint("loose".into())));
        assert!(err.issues.contains(&ModelIssue::InconsistentBounds("backwards".into())));
    }

    #[test]
    fn test_missing_objective_coefficient() {
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("x", [("budget", 1.0)]);
        let err = model.validate().unwrap_err();
        assert_eq!(err.issues, vec![ModelIssue::NoObjectiveCoefficient("cost".into())]);
        assert!(err.to_string().contains("cost"));
    }

    #[test]
    fn test_non_finite_coefficient() {
        let mut model = LpModel::new("cost", Direction::Minimize);
        model.add_binary("x", [("cost", f64::NAN)]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_activity_and_satisfaction() {
        let model = knapsack();
        let mut values = BTreeMap::new();
        values.insert("a".to_string(), 1u8);
        values.insert("b".to_string(), 1u8);
        assert_eq!(model.activity("weight", &values), 5.0);
        assert!(!model.is_satisfied_by(&values, 1e-9));

        values.insert("b".to_string(), 0u8);
        assert_eq!(model.objective_value(&values), 3.0);
        assert!(model.is_satisfied_by(&values, 1e-9));
    }

    #[test]
    fn test_bound_effective_limits() {
        let b = Bound { min: Some(1.0), max: None, equal: Some(2.0) };
        assert_eq!(b.lower(), 2.0);
        assert_eq!(b.upper(), 2.0);
        assert!(Bound::at_least(1.0).admits(1.0, 0.0));
        assert!(!Bound::at_most(1.0).admits(1.5, 1e-9));
    }

    #[test]
    fn test_weighted_sum_combines_attributes() {
        let mut model = knapsack();
        model.variables.get_mut("a").unwrap().insert("risk".into(), 1.0);
        let weights = BTreeMap::from([("value".to_string(), 2.0), ("risk".to_string(), -0.5)]);

        let combined = model.weighted_sum("score", &weights);
        assert_eq!(combined.optimize, "score");
        assert_eq!(combined.op_type, Direction::Maximize);
        assert_eq!(combined.coefficient("a", "score"), 5.5);
        assert_eq!(combined.coefficient("b", "score"), 8.0);
        // original attributes and rows survive
        assert_eq!(combined.coefficient("a", "value"), 3.0);
        assert_eq!(combined.constraints, model.constraints);
        assert_eq!(combined.validate(), Ok(()));
    }

    #[test]
    fn test_with_objective_coefficient() {
        let model = knapsack().with_objective_coefficient("b", 1.0);
        assert_eq!(model.coefficient("b", "value"), 1.0);
        assert_eq!(model.coefficient("a", "value"), 3.0);
        assert_eq!(knapsack().with_objective_coefficient("missing", 1.0), knapsack());
    }

    #[test]
    fn test_serializes_in_solver_format() {
        let json = serde_json::to_value(knapsack()).unwrap();
        assert_eq!(json["opType"], "max");
        assert_eq!(json["constraints"]["weight"]["max"], 4.0);
        assert!(json["constraints"]["weight"].get("min").is_none());
    }
}

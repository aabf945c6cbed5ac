//! Optimizer configuration

use crate::{
    BranchAndBound, FormulationOptions, OptimizationMode, OptimizerError, PartialCoverage, Result,
    DEFAULT_CANDIDATE_TYPES,
};
use debris_coverage::FacilityType;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Run settings, loadable from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizerConfig {
    pub mode: OptimizationMode,
    /// Budget cap in cost units. Required in max-coverage mode.
    pub budget: Option<f64>,
    /// Fraction of debris to cover in min-cost mode; `None` means all
    pub min_coverage: Option<f64>,
    pub partial_coverage: PartialCoverage,
    pub reduce_dominated: bool,
    /// Branch-and-bound node budget
    pub node_limit: u64,
    pub facility_types: Vec<FacilityType>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            mode: OptimizationMode::MinCost,
            budget: None,
            min_coverage: None,
            partial_coverage: PartialCoverage::Aggregate,
            reduce_dominated: true,
            node_limit: crate::solver::DEFAULT_NODE_LIMIT,
            facility_types: DEFAULT_CANDIDATE_TYPES.to_vec(),
        }
    }
}

impl OptimizerConfig {
    /// Read settings from a JSON file. Validation is left to the caller so
    /// command-line overrides can be applied first.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading optimizer config from {:?}", path);

        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(b) = self.budget {
            if !b.is_finite() || b < 0.0 {
                return Err(OptimizerError::InvalidParameter(format!(
                    "budget must be a non-negative number, got {b}"
                )));
            }
        }
        if let Some(m) = self.min_coverage {
            if !(0.0..=1.0).contains(&m) {
                return Err(OptimizerError::InvalidParameter(format!(
                    "minCoverage must be within [0, 1], got {m}"
                )));
            }
        }
        if self.node_limit == 0 {
            return Err(OptimizerError::InvalidParameter("nodeLimit must be positive".into()));
        }
        if !self.facility_types.iter().any(FacilityType::monitors) {
            return Err(OptimizerError::InvalidParameter(
                "facilityTypes must include at least one monitoring type".into(),
            ));
        }
        if self.mode == OptimizationMode::MaxCoverage && self.budget.is_none() {
            return Err(OptimizerError::InvalidParameter(
                "max-coverage mode requires a budget".into(),
            ));
        }
        Ok(())
    }

    pub fn formulation_options(&self) -> FormulationOptions {
        FormulationOptions {
            partial_coverage: self.partial_coverage,
            reduce_dominated: self.reduce_dominated,
        }
    }

    pub fn solver(&self) -> BranchAndBound {
        BranchAndBound::with_node_limit(self.node_limit)
    }
}

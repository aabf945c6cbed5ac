//! Human-readable description of a placement problem as a set-cover program

use crate::formulation::undominated;
use crate::{FormulationOptions, OptimizationMode, PartialCoverage, SetCoverProblem};

/// Markdown summary of the program the optimizer would build for `problem`
pub fn explain_formulation(
    problem: &SetCoverProblem<'_>,
    mode: OptimizationMode,
    options: &FormulationOptions,
) -> String {
    let n = problem.debris.len();
    let candidates = problem.candidates;
    let mut out = String::new();

    out.push_str("# Facility placement as weighted set cover\n\n");
    out.push_str(&format!(
        "- Debris to track (I): {}\n- Facility candidates (J): {}\n",
        n,
        candidates.len()
    ));
    if let Some(b) = problem.budget_limit {
        out.push_str(&format!("- Budget (B): {b:.0} cost units\n"));
    }
    out.push('\n');

    match mode {
        OptimizationMode::MinCost => {
            out.push_str("## Min-cost\n\n```text\nminimize   Σ_j c_j·x_j\n");
            match (problem.coverage_requirement(), options.partial_coverage) {
                (None, _) => out.push_str("s.t.       Σ_j a_ij·x_j ≥ 1     for every debris i\n"),
                (Some(k), PartialCoverage::Aggregate) => out.push_str(&format!(
                    "s.t.       Σ_j a_ij·x_j ≥ y_i   for every debris i\n           Σ_i y_i ≥ {k}\n           y_i ∈ {{0, 1}}\n"
                )),
                (Some(_), PartialCoverage::Unenforced) => {
                    out.push_str("           (coverage target not enforced)\n")
                }
            }
        }
        OptimizationMode::MaxCoverage => {
            out.push_str("## Max-coverage\n\n```text\nmaximize   Σ_j |covered(j)|·x_j\ns.t.\n");
        }
    }
    if problem.budget_limit.is_some() || mode == OptimizationMode::MaxCoverage {
        out.push_str("           Σ_j c_j·x_j ≤ B\n");
    }
    out.push_str("           x_j ∈ {0, 1}\n```\n\n");

    if mode == OptimizationMode::MaxCoverage {
        out.push_str(
            "The objective counts a debris once for every selected candidate covering it. \
             Reported coverage counts each debris once.\n\n",
        );
    } else if options.reduce_dominated {
        let kept = undominated(candidates).len();
        if kept < candidates.len() {
            out.push_str(&format!(
                "{} candidates are dominated by a cheaper or equal candidate covering at least the same debris and are left out.\n\n",
                candidates.len() - kept
            ));
        }
    }

    let unreachable: Vec<&str> = (0..n)
        .filter(|i| !candidates.iter().any(|c| c.coverage.get(*i).copied().unwrap_or(false)))
        .map(|i| problem.debris[i].id.as_str())
        .collect();
    if !unreachable.is_empty() {
        out.push_str(&format!(
            "{} debris cannot be covered by any candidate: {}\n\n",
            unreachable.len(),
            unreachable.join(", ")
        ));
    }

    if !candidates.is_empty() {
        out.push_str("| Candidate | Location | Cost | Covers |\n|---|---|---|---|\n");
        for c in candidates {
            out.push_str(&format!(
                "| {} | {} | {:.0} | {} |\n",
                c.id,
                c.name(),
                c.cost,
                c.covered_count()
            ));
        }
    }

    out
}

//! Coverage what-if analysis and gap recommendations

use crate::{aggregate_coverage, CoverageReport, Debris, Facility, FacilityStatus, FacilityType, OrbitalRegion};
use serde::{Deserialize, Serialize};

/// Default per-band target used when looking for coverage gaps
pub const DEFAULT_GAP_TARGET: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageForecast {
    pub current_coverage: f64,
    pub predicted_coverage: f64,
    pub increase: f64,
}

/// Coverage before and after adding `new_facility`, which is simulated as
/// operational regardless of its current status.
pub fn predict_coverage_increase(
    existing: &[Facility],
    new_facility: &Facility,
    debris: &[Debris],
) -> CoverageForecast {
    let current = aggregate_coverage(existing, debris).total_coverage;

    let mut with_new = existing.to_vec();
    with_new.push(new_facility.clone().with_status(FacilityStatus::Operational));
    let predicted = aggregate_coverage(&with_new, debris).total_coverage;

    CoverageForecast {
        current_coverage: current,
        predicted_coverage: predicted,
        increase: predicted - current,
    }
}

/// Bands whose tracked ratio is below `target`, in altitude order
pub fn identify_gaps(report: &CoverageReport, target: f64) -> Vec<OrbitalRegion> {
    OrbitalRegion::ALL
        .into_iter()
        .filter(|region| report.by_region.get(*region) < target)
        .collect()
}

/// Facility types suited to closing the given gaps, without duplicates
pub fn recommended_facility_types(gaps: &[OrbitalRegion]) -> Vec<FacilityType> {
    let mut out: Vec<FacilityType> = Vec::new();
    for gap in gaps {
        let suited: &[FacilityType] = match gap {
            OrbitalRegion::LeoLower | OrbitalRegion::LeoUpper => {
                &[FacilityType::RadarSband, FacilityType::RadarCband]
            }
            OrbitalRegion::Meo => &[FacilityType::RadarCband, FacilityType::SurveillanceSatellite],
            OrbitalRegion::Geo => &[FacilityType::OpticalTelescope, FacilityType::SurveillanceSatellite],
        };
        for t in suited {
            if !out.contains(t) {
                out.push(*t);
            }
        }
    }
    out
}

//! Candidate generation: ground sites and orbital bands × facility types

use debris_coverage::{
    can_cover, Debris, Facility, FacilityCategory, FacilityLocation, FacilityType, VisibilityRule,
    GROUND_SITES,
};
use orbital_mechanics::OrbitalElements;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Altitudes (km) tried for space-based candidates
pub const CANDIDATE_ALTITUDES_KM: [f64; 4] = [500.0, 800.0, 1200.0, 20000.0];

/// Inclinations (deg) tried for space-based candidates
pub const CANDIDATE_INCLINATIONS_DEG: [f64; 4] = [28.0, 45.0, 63.0, 90.0];

/// Facility types considered when the caller does not choose
pub const DEFAULT_CANDIDATE_TYPES: [FacilityType; 4] = [
    FacilityType::RadarSband,
    FacilityType::RadarCband,
    FacilityType::OpticalTelescope,
    FacilityType::SurveillanceSatellite,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CandidateLocation {
    Ground {
        latitude: f64,
        longitude: f64,
        name: String,
    },
    Space {
        #[serde(rename = "altitude")]
        altitude_km: f64,
        #[serde(rename = "inclination")]
        inclination_deg: f64,
        name: String,
    },
}

impl CandidateLocation {
    pub fn name(&self) -> &str {
        match self {
            CandidateLocation::Ground { name, .. } | CandidateLocation::Space { name, .. } => name,
        }
    }
}

/// A possible facility, with its coverage against one debris snapshot.
///
/// `coverage[i]` refers to the i-th debris of the snapshot the candidate was
/// generated for. Candidates must be regenerated when that snapshot changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityCandidate {
    pub id: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub location: CandidateLocation,
    pub cost: f64,
    pub coverage: Vec<bool>,
}

impl FacilityCandidate {
    pub fn covered_count(&self) -> usize {
        self.coverage.iter().filter(|c| **c).count()
    }

    pub fn covered_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.coverage
            .iter()
            .enumerate()
            .filter_map(|(i, covered)| covered.then_some(i))
    }

    pub fn name(&self) -> &str {
        self.location.name()
    }

    /// Operational facility standing in for this candidate
    pub fn synthesize_facility(&self) -> Facility {
        let location = match &self.location {
            CandidateLocation::Ground { latitude, longitude, .. } => FacilityLocation::Ground {
                latitude: *latitude,
                longitude: *longitude,
            },
            CandidateLocation::Space { altitude_km, inclination_deg, .. } => FacilityLocation::Space {
                orbit: OrbitalElements::circular(*altitude_km, *inclination_deg),
            },
        };
        Facility::operational(self.id.clone(), self.facility_type, location).with_name(self.name())
    }

    /// Placement-rule bitmap of this candidate over `debris`
    pub fn compute_coverage(&self, debris: &[Debris]) -> Vec<bool> {
        let facility = self.synthesize_facility();
        debris
            .iter()
            .map(|d| can_cover(&facility, d, VisibilityRule::Placement))
            .collect()
    }
}

/// Enumerate every candidate that covers at least one debris in `debris`.
///
/// Ground types are placed at each catalog site, space types at each
/// altitude/inclination pair. Types that do not monitor are ignored. Ids are
/// `candidate-N`, unique within one call.
pub fn generate_candidates(debris: &[Debris], facility_types: &[FacilityType]) -> Vec<FacilityCandidate> {
    let monitoring: Vec<FacilityType> = facility_types.iter().copied().filter(FacilityType::monitors).collect();
    let ground: Vec<FacilityType> = monitoring
        .iter()
        .copied()
        .filter(|t| t.category() == FacilityCategory::Ground)
        .collect();
    let space: Vec<FacilityType> = monitoring
        .iter()
        .copied()
        .filter(|t| t.category() == FacilityCategory::Space)
        .collect();

    info!(
        "Generating candidates for {} debris ({} ground types, {} space types)",
        debris.len(),
        ground.len(),
        space.len()
    );

    let mut layouts = Vec::new();
    for site in GROUND_SITES.iter() {
        for t in &ground {
            layouts.push((
                *t,
                CandidateLocation::Ground {
                    latitude: site.latitude,
                    longitude: site.longitude,
                    name: format!("{} - {}", site.name, t.definition().name),
                },
            ));
        }
    }
    for altitude in CANDIDATE_ALTITUDES_KM {
        for inclination in CANDIDATE_INCLINATIONS_DEG {
            for t in &space {
                layouts.push((
                    *t,
                    CandidateLocation::Space {
                        altitude_km: altitude,
                        inclination_deg: inclination,
                        name: format!("{} @ {}km/{}°", t.definition().name, altitude, inclination),
                    },
                ));
            }
        }
    }

    let considered = layouts.len();
    let mut candidates = Vec::new();
    for (facility_type, location) in layouts {
        let mut candidate = FacilityCandidate {
            id: format!("candidate-{}", candidates.len()),
            facility_type,
            location,
            cost: facility_type.definition().construction_cost,
            coverage: Vec::new(),
        };
        candidate.coverage = candidate.compute_coverage(debris);

        if candidate.covered_count() == 0 {
            continue;
        }
        debug!(
            "{} ({}) covers {} debris at cost {}",
            candidate.id,
            candidate.name(),
            candidate.covered_count(),
            candidate.cost
        );
        candidates.push(candidate);
    }

    info!(
        "Kept {} of {} candidate layouts",
        candidates.len(),
        considered
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use debris_coverage::DebrisSize;

    fn debris(id: &str, altitude: f64, inclination: f64, size: DebrisSize) -> Debris {
        Debris::new(id, OrbitalElements::circular(altitude, inclination), size)
    }

    #[test]
    fn test_empty_debris_yields_no_candidates() {
        assert!(generate_candidates(&[], &DEFAULT_CANDIDATE_TYPES).is_empty());
    }

    #[test]
    fn test_every_candidate_covers_something() {
        let field = vec![
            debris("a", 400.0, 98.0, DebrisSize::Large),
            debris("b", 25000.0, 55.0, DebrisSize::Medium),
            debris("c", 36000.0, 0.5, DebrisSize::Large),
        ];
        let candidates = generate_candidates(&field, &DEFAULT_CANDIDATE_TYPES);
        assert!(!candidates.is_empty());
        for c in &candidates {
            assert_eq!(c.coverage.len(), field.len());
            assert!(c.covered_count() > 0, "{} covers nothing", c.id);
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let field = vec![debris("a", 900.0, 98.0, DebrisSize::Large)];
        let candidates = generate_candidates(&field, &DEFAULT_CANDIDATE_TYPES);
        for (i, c) in candidates.iter().enumerate() {
            assert_eq!(c.id, format!("candidate-{i}"));
        }
    }

    #[test]
    fn test_bitmap_matches_synthesized_facility() {
        let field = vec![
            debris("polar", 700.0, 98.0, DebrisSize::Medium),
            debris("equatorial", 700.0, 5.0, DebrisSize::Large),
            debris("tiny", 900.0, 60.0, DebrisSize::Small),
            debris("high", 30000.0, 20.0, DebrisSize::Large),
        ];
        for c in generate_candidates(&field, &DEFAULT_CANDIDATE_TYPES) {
            let facility = c.synthesize_facility();
            assert!(facility.is_operational());
            for (i, d) in field.iter().enumerate() {
                assert_eq!(c.coverage[i], can_cover(&facility, d, VisibilityRule::Placement));
            }
        }
    }

    #[test]
    fn test_ground_latitude_blocks_low_inclination() {
        // 5° inclination is invisible from every site above 15° latitude
        let field = vec![debris("eq", 800.0, 5.0, DebrisSize::Large)];
        let candidates = generate_candidates(&field, &[FacilityType::RadarSband]);
        assert!(!candidates.is_empty());
        for c in &candidates {
            match &c.location {
                CandidateLocation::Ground { latitude, .. } => assert!(latitude.abs() <= 15.0),
                CandidateLocation::Space { .. } => panic!("no space types requested"),
            }
        }
    }

    #[test]
    fn test_non_monitoring_types_are_ignored() {
        let field = vec![debris("a", 800.0, 98.0, DebrisSize::Large)];
        let candidates = generate_candidates(&field, &[FacilityType::RemovalLaser, FacilityType::RemovalNet]);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_space_candidates_enumerate_orbit_grid() {
        let field = vec![debris("a", 800.0, 98.0, DebrisSize::Large)];
        let candidates = generate_candidates(&field, &[FacilityType::SurveillanceSatellite]);
        assert_eq!(candidates.len(), CANDIDATE_ALTITUDES_KM.len() * CANDIDATE_INCLINATIONS_DEG.len());
        assert!(candidates.iter().all(|c| c.cost == 150.0));
        assert_eq!(candidates[0].name(), "Surveillance Satellite @ 500km/28°");
    }
}

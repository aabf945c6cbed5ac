//! Debris Coverage Library
//!
//! Data model for tracked debris and monitoring facilities, the facility
//! type catalog, and the deterministic coverage model that decides which
//! facility can see which debris object.
//!
//! Two visibility rules exist:
//!
//! | Rule | Used by | Latitude test | Probabilistic |
//! |------|---------|---------------|---------------|
//! | [`VisibilityRule::Placement`] | candidate bitmaps | `i < abs(lat) - 10` blocks | no |
//! | [`VisibilityRule::Live`] | per-turn tracking | `i < 0.8 * abs(lat)` halves the fraction | stable hash roll |

use thiserror::Error;

pub mod analysis;
pub mod coverage;
pub mod debris;
pub mod facility;
pub mod region;

pub use analysis::{
    identify_gaps, predict_coverage_increase, recommended_facility_types, CoverageForecast, DEFAULT_GAP_TARGET,
};
pub use coverage::{aggregate_coverage, can_cover, visibility_roll, CoverageReport, RegionCoverage, VisibilityRule};
pub use debris::{DangerLevel, Debris, DebrisKind, DebrisSize, DebrisStatus, PhysicalProperties, RiskAssessment};
pub use facility::{
    Facility, FacilityCategory, FacilityLocation, FacilityStatus, FacilityType, FacilityTypeDefinition,
    GroundSite, MonitoringCapability, RemovalCapability, RemovalMethod, GROUND_SITES,
};
pub use region::OrbitalRegion;

#[derive(Error, Debug, PartialEq)]
pub enum CoverageError {
    #[error("Unknown facility type: {0}")]
    UnknownFacilityType(String),
    #[error("Invalid orbit for {id}: {source}")]
    InvalidOrbit {
        id: String,
        #[source]
        source: orbital_mechanics::OrbitalError,
    },
    #[error("Invalid monitoring band for {0}: min altitude exceeds max altitude")]
    InvalidMonitoringBand(String),
}

pub type Result<T> = std::result::Result<T, CoverageError>;

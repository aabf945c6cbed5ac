//! Coverage predicate and aggregation
//!
//! `can_cover` applies, in order: operational + monitoring capability,
//! inclusive altitude band, detectable size, ground latitude geometry, and
//! (live rule only) a stable visibility roll keyed by the facility/debris
//! identifier pair.

use crate::{Debris, Facility, OrbitalRegion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Placement rule: a ground site cannot see orbits inclined less than `|lat| - margin`
pub const PLACEMENT_LATITUDE_MARGIN_DEG: f64 = 10.0;

/// Live rule: orbits inclined less than `ratio * |lat|` are marginal for a ground site
pub const LIVE_MARGINAL_LATITUDE_RATIO: f64 = 0.8;

/// Coverage fraction multiplier applied to marginal geometry
pub const MARGINAL_ADJUSTMENT: f64 = 0.5;

/// Game-balance boost applied to the catalog coverage fraction
pub const LIVE_COVERAGE_BOOST: f64 = 3.0;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Which variant of the coverage predicate to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityRule {
    /// Geometry only, used for candidate bitmaps. Coverage is guaranteed once
    /// the geometric checks pass.
    Placement,
    /// Per-turn tracking with the stable visibility roll
    Live,
}

/// Decide whether `facility` can detect `debris` under `rule`
pub fn can_cover(facility: &Facility, debris: &Debris, rule: VisibilityRule) -> bool {
    let Some(monitoring) = facility.active_monitoring() else {
        return false;
    };

    if !monitoring.in_band(debris.altitude_km()) {
        return false;
    }

    if debris.size_cm() < monitoring.min_detectable_size_cm {
        return false;
    }

    match rule {
        VisibilityRule::Placement => !placement_geometry_blocked(facility, debris),
        VisibilityRule::Live => {
            let adjustment = if live_geometry_marginal(facility, debris) {
                MARGINAL_ADJUSTMENT
            } else {
                1.0
            };
            let adjusted =
                (monitoring.base_coverage_fraction * adjustment * LIVE_COVERAGE_BOOST).min(1.0);
            visibility_roll(&facility.id, &debris.id) < adjusted
        }
    }
}

fn placement_geometry_blocked(facility: &Facility, debris: &Debris) -> bool {
    match facility.location.ground_latitude() {
        Some(lat) => debris.inclination_deg() < lat.abs() - PLACEMENT_LATITUDE_MARGIN_DEG,
        None => false,
    }
}

fn live_geometry_marginal(facility: &Facility, debris: &Debris) -> bool {
    match facility.location.ground_latitude() {
        Some(lat) => debris.inclination_deg() < lat.abs() * LIVE_MARGINAL_LATITUDE_RATIO,
        None => false,
    }
}

/// Stable visibility roll in `[0, 1)` for a facility/debris pair.
///
/// FNV-1a (64-bit) over the UTF-8 bytes of `"{facility_id}-{debris_id}"`,
/// reduced as `(hash % 1000) / 1000`. The value depends only on the two
/// identifiers, so the same pair resolves identically on every turn and on
/// every platform.
pub fn visibility_roll(facility_id: &str, debris_id: &str) -> f64 {
    let mut hash = FNV_OFFSET_BASIS;
    let bytes = facility_id
        .bytes()
        .chain(std::iter::once(b'-'))
        .chain(debris_id.bytes());
    for byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    (hash % 1000) as f64 / 1000.0
}

/// Tracked ratio per orbital band (0 when a band holds no active debris)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionCoverage {
    #[serde(rename = "LEO-Lower")]
    pub leo_lower: f64,
    #[serde(rename = "LEO-Upper")]
    pub leo_upper: f64,
    #[serde(rename = "MEO")]
    pub meo: f64,
    #[serde(rename = "GEO")]
    pub geo: f64,
}

impl RegionCoverage {
    pub fn get(&self, region: OrbitalRegion) -> f64 {
        match region {
            OrbitalRegion::LeoLower => self.leo_lower,
            OrbitalRegion::LeoUpper => self.leo_upper,
            OrbitalRegion::Meo => self.meo,
            OrbitalRegion::Geo => self.geo,
        }
    }

    fn set(&mut self, region: OrbitalRegion, value: f64) {
        match region {
            OrbitalRegion::LeoLower => self.leo_lower = value,
            OrbitalRegion::LeoUpper => self.leo_upper = value,
            OrbitalRegion::Meo => self.meo = value,
            OrbitalRegion::Geo => self.geo = value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    /// Tracked / active debris (0 when there is no active debris)
    pub total_coverage: f64,
    pub tracked_count: usize,
    pub untracked_count: usize,
    pub by_region: RegionCoverage,
    /// debris id -> ids of facilities currently tracking it (active debris only)
    pub tracking: BTreeMap<String, Vec<String>>,
}

impl CoverageReport {
    /// Only tracked debris is eligible for removal actions
    pub fn is_tracked(&self, debris_id: &str) -> bool {
        self.tracking
            .get(debris_id)
            .map(|facilities| !facilities.is_empty())
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.tracked_count + self.untracked_count
    }
}

#[derive(Default, Clone, Copy)]
struct BandCount {
    total: usize,
    tracked: usize,
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Evaluate the live rule for every operational monitoring facility against
/// every active debris object.
pub fn aggregate_coverage(facilities: &[Facility], debris: &[Debris]) -> CoverageReport {
    let monitors: Vec<&Facility> = facilities
        .iter()
        .filter(|f| f.active_monitoring().is_some())
        .collect();

    let mut tracking = BTreeMap::new();
    let mut bands: BTreeMap<OrbitalRegion, BandCount> = BTreeMap::new();
    let mut tracked_count = 0;
    let mut active_count = 0;

    for d in debris.iter().filter(|d| d.is_active()) {
        active_count += 1;

        let trackers: Vec<String> = monitors
            .iter()
            .filter(|f| can_cover(f, d, VisibilityRule::Live))
            .map(|f| f.id.clone())
            .collect();

        let band = bands.entry(OrbitalRegion::from_altitude(d.altitude_km())).or_default();
        band.total += 1;
        if !trackers.is_empty() {
            band.tracked += 1;
            tracked_count += 1;
        }

        tracking.insert(d.id.clone(), trackers);
    }

    let mut by_region = RegionCoverage::default();
    for region in OrbitalRegion::ALL {
        let band = bands.get(&region).copied().unwrap_or_default();
        by_region.set(region, ratio(band.tracked, band.total));
    }

    debug!(
        "Coverage: {}/{} active debris tracked by {} monitoring facilities",
        tracked_count,
        active_count,
        monitors.len()
    );

    CoverageReport {
        total_coverage: ratio(tracked_count, active_count),
        tracked_count,
        untracked_count: active_count - tracked_count,
        by_region,
        tracking,
    }
}

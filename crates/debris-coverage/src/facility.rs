//! Facility catalog and facility records
//!
//! The catalog holds the eight buildable facility types with their cost,
//! construction time and capabilities. Facility records are created by the
//! turn logic; this crate only reads them.

use crate::{CoverageError, DebrisSize, Result};
use orbital_mechanics::OrbitalElements;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    RadarSband,
    RadarCband,
    OpticalTelescope,
    LaserRanging,
    SurveillanceSatellite,
    RemovalMagnetic,
    RemovalNet,
    RemovalLaser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    Ground,
    Space,
}

/// Monitoring band and sensitivity of a facility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringCapability {
    #[serde(rename = "minAltitude")]
    pub min_altitude_km: f64,
    #[serde(rename = "maxAltitude")]
    pub max_altitude_km: f64,
    #[serde(rename = "minDetectableSize")]
    pub min_detectable_size_cm: f64,
    pub base_coverage_fraction: f64,
}

impl MonitoringCapability {
    /// Inclusive altitude band check
    pub fn in_band(&self, altitude_km: f64) -> bool {
        altitude_km >= self.min_altitude_km && altitude_km <= self.max_altitude_km
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalMethod {
    Magnetic,
    Net,
    Laser,
    Harpoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RemovalCapability {
    pub annual_capacity: u32,
    pub method: RemovalMethod,
    pub target_sizes: &'static [DebrisSize],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FacilityTypeDefinition {
    pub facility_type: FacilityType,
    pub name: &'static str,
    pub description: &'static str,
    pub category: FacilityCategory,
    /// Construction cost (cost units)
    pub construction_cost: f64,
    /// Upkeep per turn (cost units)
    pub monthly_cost: f64,
    /// Turns until operational
    pub construction_turns: u32,
    pub monitoring: Option<MonitoringCapability>,
    pub removal: Option<RemovalCapability>,
}

const fn monitoring(min_alt: f64, max_alt: f64, min_size: f64, coverage: f64) -> Option<MonitoringCapability> {
    Some(MonitoringCapability {
        min_altitude_km: min_alt,
        max_altitude_km: max_alt,
        min_detectable_size_cm: min_size,
        base_coverage_fraction: coverage,
    })
}

static CATALOG: [FacilityTypeDefinition; 8] = [
    FacilityTypeDefinition {
        facility_type: FacilityType::RadarSband,
        name: "S-band Radar",
        description: "Tracks LEO debris of 10 cm and above. Little weather impact.",
        category: FacilityCategory::Ground,
        construction_cost: 50.0,
        monthly_cost: 0.5,
        construction_turns: 1,
        monitoring: monitoring(200.0, 2000.0, 10.0, 0.25),
        removal: None,
    },
    FacilityTypeDefinition {
        facility_type: FacilityType::RadarCband,
        name: "C-band Radar",
        description: "Precision tracking of LEO to MEO debris of 5 cm and above.",
        category: FacilityCategory::Ground,
        construction_cost: 100.0,
        monthly_cost: 1.0,
        construction_turns: 3,
        monitoring: monitoring(200.0, 20000.0, 5.0, 0.35),
        removal: None,
    },
    FacilityTypeDefinition {
        facility_type: FacilityType::OpticalTelescope,
        name: "Optical Telescope",
        description: "Watches MEO and GEO. Operates only on clear nights.",
        category: FacilityCategory::Ground,
        construction_cost: 30.0,
        monthly_cost: 0.3,
        construction_turns: 1,
        monitoring: monitoring(2000.0, 40000.0, 50.0, 0.2),
        removal: None,
    },
    FacilityTypeDefinition {
        facility_type: FacilityType::LaserRanging,
        name: "Laser Ranging Station",
        description: "Millimetre-grade orbit determination for cooperative targets.",
        category: FacilityCategory::Ground,
        construction_cost: 80.0,
        monthly_cost: 0.8,
        construction_turns: 2,
        monitoring: monitoring(200.0, 40000.0, 1.0, 0.15),
        removal: None,
    },
    FacilityTypeDefinition {
        facility_type: FacilityType::SurveillanceSatellite,
        name: "Surveillance Satellite",
        description: "Observes from orbit in every direction. Needs delta-v for station keeping.",
        category: FacilityCategory::Space,
        construction_cost: 150.0,
        monthly_cost: 2.0,
        construction_turns: 6,
        monitoring: monitoring(200.0, 40000.0, 5.0, 0.4),
        removal: None,
    },
    FacilityTypeDefinition {
        facility_type: FacilityType::RemovalMagnetic,
        name: "Removal Satellite (Magnetic)",
        description: "Captures metallic debris magnetically.",
        category: FacilityCategory::Space,
        construction_cost: 200.0,
        monthly_cost: 3.0,
        construction_turns: 6,
        monitoring: None,
        removal: Some(RemovalCapability {
            annual_capacity: 5,
            method: RemovalMethod::Magnetic,
            target_sizes: &[DebrisSize::Medium, DebrisSize::Large],
        }),
    },
    FacilityTypeDefinition {
        facility_type: FacilityType::RemovalNet,
        name: "Removal Satellite (Net)",
        description: "Nets debris of irregular shape.",
        category: FacilityCategory::Space,
        construction_cost: 180.0,
        monthly_cost: 2.5,
        construction_turns: 5,
        monitoring: None,
        removal: Some(RemovalCapability {
            annual_capacity: 3,
            method: RemovalMethod::Net,
            target_sizes: &[DebrisSize::Small, DebrisSize::Medium, DebrisSize::Large],
        }),
    },
    FacilityTypeDefinition {
        facility_type: FacilityType::RemovalLaser,
        name: "Removal Satellite (Laser)",
        description: "Ablates small debris. Efficient but expensive.",
        category: FacilityCategory::Space,
        construction_cost: 300.0,
        monthly_cost: 5.0,
        construction_turns: 8,
        monitoring: None,
        removal: Some(RemovalCapability {
            annual_capacity: 20,
            method: RemovalMethod::Laser,
            target_sizes: &[DebrisSize::Small],
        }),
    },
];

impl FacilityType {
    pub const ALL: [FacilityType; 8] = [
        FacilityType::RadarSband,
        FacilityType::RadarCband,
        FacilityType::OpticalTelescope,
        FacilityType::LaserRanging,
        FacilityType::SurveillanceSatellite,
        FacilityType::RemovalMagnetic,
        FacilityType::RemovalNet,
        FacilityType::RemovalLaser,
    ];

    pub fn definition(&self) -> &'static FacilityTypeDefinition {
        // CATALOG is declared in the same order as the enum
        &CATALOG[*self as usize]
    }

    pub fn category(&self) -> FacilityCategory {
        self.definition().category
    }

    pub fn monitors(&self) -> bool {
        self.definition().monitoring.is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::RadarSband => "radar_sband",
            FacilityType::RadarCband => "radar_cband",
            FacilityType::OpticalTelescope => "optical_telescope",
            FacilityType::LaserRanging => "laser_ranging",
            FacilityType::SurveillanceSatellite => "surveillance_satellite",
            FacilityType::RemovalMagnetic => "removal_magnetic",
            FacilityType::RemovalNet => "removal_net",
            FacilityType::RemovalLaser => "removal_laser",
        }
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityType {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self> {
        FacilityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| CoverageError::UnknownFacilityType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityStatus {
    Constructing,
    Operational,
    Maintenance,
    Decommissioned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacilityLocation {
    Ground { latitude: f64, longitude: f64 },
    Space { orbit: OrbitalElements },
}

impl FacilityLocation {
    /// Ground latitude in degrees, `None` for space facilities
    pub fn ground_latitude(&self) -> Option<f64> {
        match self {
            FacilityLocation::Ground { latitude, .. } => Some(*latitude),
            FacilityLocation::Space { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub name: String,
    pub location: FacilityLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<MonitoringCapability>,
    pub status: FacilityStatus,
    #[serde(default)]
    pub construction_cost: f64,
    #[serde(default)]
    pub monthly_cost: f64,
}

impl Facility {
    /// New facility under construction, capabilities taken from the catalog
    pub fn new(id: impl Into<String>, facility_type: FacilityType, location: FacilityLocation) -> Self {
        let def = facility_type.definition();
        Self {
            id: id.into(),
            facility_type,
            name: def.name.to_string(),
            location,
            monitoring: def.monitoring,
            status: FacilityStatus::Constructing,
            construction_cost: def.construction_cost,
            monthly_cost: def.monthly_cost,
        }
    }

    pub fn operational(id: impl Into<String>, facility_type: FacilityType, location: FacilityLocation) -> Self {
        Self::new(id, facility_type, location).with_status(FacilityStatus::Operational)
    }

    pub fn with_status(mut self, status: FacilityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_operational(&self) -> bool {
        self.status == FacilityStatus::Operational
    }

    /// Monitoring capability if this facility currently participates in coverage
    pub fn active_monitoring(&self) -> Option<&MonitoringCapability> {
        if self.is_operational() {
            self.monitoring.as_ref()
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(m) = &self.monitoring {
            if m.min_altitude_km > m.max_altitude_km {
                return Err(CoverageError::InvalidMonitoringBand(self.id.clone()));
            }
        }
        if let FacilityLocation::Space { orbit } = &self.location {
            orbit.validate().map_err(|source| CoverageError::InvalidOrbit {
                id: self.id.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Fixed ground site available for new facilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundSite {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub country: &'static str,
}

/// Ground sites modelled on existing space surveillance locations
pub static GROUND_SITES: [GroundSite; 12] = [
    GroundSite { name: "Alaska", latitude: 64.8, longitude: -147.7, country: "USA" },
    GroundSite { name: "Hawaii", latitude: 19.8, longitude: -155.5, country: "USA" },
    GroundSite { name: "California", latitude: 34.0, longitude: -118.2, country: "USA" },
    GroundSite { name: "Massachusetts", latitude: 42.4, longitude: -71.1, country: "USA" },
    GroundSite { name: "United Kingdom", latitude: 51.5, longitude: -0.1, country: "UK" },
    GroundSite { name: "Germany", latitude: 52.5, longitude: 13.4, country: "Germany" },
    GroundSite { name: "Australia", latitude: -33.9, longitude: 151.2, country: "Australia" },
    GroundSite { name: "Japan (Kamisaibara)", latitude: 35.2, longitude: 133.8, country: "Japan" },
    GroundSite { name: "Japan (Bisei)", latitude: 34.7, longitude: 133.5, country: "Japan" },
    GroundSite { name: "Chile", latitude: -33.4, longitude: -70.6, country: "Chile" },
    GroundSite { name: "South Africa", latitude: -33.9, longitude: 18.4, country: "South Africa" },
    GroundSite { name: "India", latitude: 13.0, longitude: 77.6, country: "India" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_enum() {
        for t in FacilityType::ALL {
            assert_eq!(t.definition().facility_type, t);
        }
    }

    #[test]
    fn test_monitoring_and_removal_are_exclusive() {
        for t in FacilityType::ALL {
            let def = t.definition();
            assert!(def.monitoring.is_some() != def.removal.is_some(), "{t}");
        }
    }

    #[test]
    fn test_parse_facility_type() {
        assert_eq!("radar_cband".parse::<FacilityType>(), Ok(FacilityType::RadarCband));
        assert_eq!(
            "death_ray".parse::<FacilityType>(),
            Err(CoverageError::UnknownFacilityType("death_ray".to_string()))
        );
    }

    #[test]
    fn test_new_facility_is_constructing() {
        let f = Facility::new(
            "f-1",
            FacilityType::RadarSband,
            FacilityLocation::Ground { latitude: 34.0, longitude: -118.2 },
        );
        assert_eq!(f.status, FacilityStatus::Constructing);
        assert!(f.active_monitoring().is_none());
        assert_eq!(f.construction_cost, 50.0);
    }

    #[test]
    fn test_removal_facility_has_no_monitoring() {
        let f = Facility::operational(
            "r-1",
            FacilityType::RemovalNet,
            FacilityLocation::Space { orbit: OrbitalElements::circular(800.0, 63.0) },
        );
        assert!(f.is_operational());
        assert!(f.active_monitoring().is_none());
    }

    #[test]
    fn test_band_is_inclusive() {
        let m = FacilityType::RadarSband.definition().monitoring.unwrap();
        assert!(m.in_band(200.0));
        assert!(m.in_band(2000.0));
        assert!(!m.in_band(2000.1));
    }

    #[test]
    fn test_facility_location_wire_format() {
        let json = r#"{"type": "ground", "latitude": 51.5, "longitude": -0.1}"#;
        let loc: FacilityLocation = serde_json::from_str(json).unwrap();
        assert_eq!(loc.ground_latitude(), Some(51.5));
    }
}

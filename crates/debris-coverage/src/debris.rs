//! Debris records as supplied by the debris-field generator

use crate::{CoverageError, Result};
use orbital_mechanics::OrbitalElements;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebrisSize {
    Small,
    Medium,
    Large,
}

impl DebrisSize {
    /// Characteristic size used for detectability checks (cm)
    pub fn detectable_size_cm(&self) -> f64 {
        match self {
            DebrisSize::Large => 100.0,
            DebrisSize::Medium => 30.0,
            DebrisSize::Small => 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebrisKind {
    RocketBody,
    Payload,
    Fragment,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebrisStatus {
    Active,
    Removed,
    Decayed,
}

/// Danger level 1 (negligible) to 5 (critical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DangerLevel(pub u8);

impl Default for DangerLevel {
    fn default() -> Self {
        DangerLevel(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalProperties {
    pub size: DebrisSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_mass: Option<f64>,
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: DebrisKind,
}

fn unknown_kind() -> DebrisKind {
    DebrisKind::Unknown
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    #[serde(default)]
    pub collision_probability: f64,
    #[serde(default)]
    pub danger_level: DangerLevel,
    #[serde(default)]
    pub tracked_by: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debris {
    pub id: String,
    /// NORAD catalog number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub orbit: OrbitalElements,
    pub physical: PhysicalProperties,
    #[serde(default)]
    pub risk: RiskAssessment,
    pub status: DebrisStatus,
}

impl Debris {
    pub fn new(id: impl Into<String>, orbit: OrbitalElements, size: DebrisSize) -> Self {
        Self {
            id: id.into(),
            catalog_number: None,
            name: None,
            orbit,
            physical: PhysicalProperties {
                size,
                estimated_mass: None,
                kind: DebrisKind::Unknown,
            },
            risk: RiskAssessment::default(),
            status: DebrisStatus::Active,
        }
    }

    pub fn altitude_km(&self) -> f64 {
        self.orbit.altitude_km()
    }

    pub fn size_cm(&self) -> f64 {
        self.physical.size.detectable_size_cm()
    }

    pub fn inclination_deg(&self) -> f64 {
        self.orbit.inclination_deg
    }

    pub fn is_active(&self) -> bool {
        self.status == DebrisStatus::Active
    }

    pub fn validate(&self) -> Result<()> {
        self.orbit.validate().map_err(|source| CoverageError::InvalidOrbit {
            id: self.id.clone(),
            source,
        })
    }
}

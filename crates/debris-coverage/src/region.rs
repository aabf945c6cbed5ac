//! Orbital altitude bands used for regional coverage reporting

use serde::{Deserialize, Serialize};
use std::fmt;

/// LEO-Lower / LEO-Upper boundary (km)
pub const LEO_SPLIT_KM: f64 = 600.0;
/// LEO / MEO boundary (km)
pub const MEO_FLOOR_KM: f64 = 2000.0;
/// Geostationary altitude (km)
pub const GEO_FLOOR_KM: f64 = 35786.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrbitalRegion {
    #[serde(rename = "LEO-Lower")]
    LeoLower,
    #[serde(rename = "LEO-Upper")]
    LeoUpper,
    #[serde(rename = "MEO")]
    Meo,
    #[serde(rename = "GEO")]
    Geo,
}

impl OrbitalRegion {
    pub const ALL: [OrbitalRegion; 4] = [
        OrbitalRegion::LeoLower,
        OrbitalRegion::LeoUpper,
        OrbitalRegion::Meo,
        OrbitalRegion::Geo,
    ];

    pub fn from_altitude(altitude_km: f64) -> Self {
        if altitude_km < LEO_SPLIT_KM {
            OrbitalRegion::LeoLower
        } else if altitude_km < MEO_FLOOR_KM {
            OrbitalRegion::LeoUpper
        } else if altitude_km < GEO_FLOOR_KM {
            OrbitalRegion::Meo
        } else {
            OrbitalRegion::Geo
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrbitalRegion::LeoLower => "LEO-Lower",
            OrbitalRegion::LeoUpper => "LEO-Upper",
            OrbitalRegion::Meo => "MEO",
            OrbitalRegion::Geo => "GEO",
        }
    }
}

impl fmt::Display for OrbitalRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

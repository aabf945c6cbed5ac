//! Orbital Mechanics Library
//!
//! Keplerian two-body geometry for debris and space facilities: altitude
//! above the reference sphere, Kepler's equation, and inertial position at
//! a time offset from epoch.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius used as the altitude reference (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Standard gravitational parameter of Earth (km³/s²)
pub const GM_KM3_S2: f64 = 398600.4418;

const KEPLER_TOLERANCE: f64 = 1e-8;
const KEPLER_MAX_ITERATIONS: usize = 100;

#[derive(Error, Debug, PartialEq)]
pub enum OrbitalError {
    #[error("Invalid semi-major axis: {0} km")]
    InvalidSemiMajorAxis(f64),
    #[error("Invalid eccentricity: {0} (must be in [0, 1))")]
    InvalidEccentricity(f64),
    #[error("Non-finite angle: {0}")]
    NonFiniteAngle(&'static str),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

/// Classical orbital elements. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalElements {
    #[serde(rename = "semiMajorAxis")]
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    #[serde(rename = "inclination")]
    pub inclination_deg: f64,
    #[serde(rename = "raan")]
    pub raan_deg: f64,
    #[serde(rename = "argumentOfPeriapsis")]
    pub arg_periapsis_deg: f64,
    #[serde(rename = "meanAnomaly")]
    pub mean_anomaly_deg: f64,
    #[serde(default = "epoch_now")]
    pub epoch: DateTime<Utc>,
}

fn epoch_now() -> DateTime<Utc> {
    Utc::now()
}

impl OrbitalElements {
    /// Near-circular orbit at the given altitude, used for space facilities.
    ///
    /// RAAN, argument of periapsis and mean anomaly are fixed at zero so the
    /// same inputs always produce the same orbit.
    pub fn circular(altitude_km: f64, inclination_deg: f64) -> Self {
        Self {
            semi_major_axis_km: altitude_to_radius(altitude_km),
            eccentricity: 0.001,
            inclination_deg,
            raan_deg: 0.0,
            arg_periapsis_deg: 0.0,
            mean_anomaly_deg: 0.0,
            epoch: Utc::now(),
        }
    }

    /// Reject non-physical element sets
    pub fn validate(&self) -> Result<()> {
        if !self.semi_major_axis_km.is_finite() || self.semi_major_axis_km <= 0.0 {
            return Err(OrbitalError::InvalidSemiMajorAxis(self.semi_major_axis_km));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitalError::InvalidEccentricity(self.eccentricity));
        }
        let angles = [
            ("inclination", self.inclination_deg),
            ("raan", self.raan_deg),
            ("argumentOfPeriapsis", self.arg_periapsis_deg),
            ("meanAnomaly", self.mean_anomaly_deg),
        ];
        for (name, value) in angles {
            if !value.is_finite() {
                return Err(OrbitalError::NonFiniteAngle(name));
            }
        }
        Ok(())
    }

    /// Altitude above the reference sphere (km)
    pub fn altitude_km(&self) -> f64 {
        self.semi_major_axis_km - EARTH_RADIUS_KM
    }

    pub fn orbital_period_s(&self) -> f64 {
        2.0 * std::f64::consts::PI * (self.semi_major_axis_km.powi(3) / GM_KM3_S2).sqrt()
    }

    pub fn mean_motion_rad_s(&self) -> f64 {
        (GM_KM3_S2 / self.semi_major_axis_km.powi(3)).sqrt()
    }

    /// Inertial position (km) `dt_seconds` after epoch
    pub fn position_at(&self, dt_seconds: f64) -> Vector3<f64> {
        let i = self.inclination_deg.to_radians();
        let raan = self.raan_deg.to_radians();
        let argp = self.arg_periapsis_deg.to_radians();
        let e = self.eccentricity;

        let mean_anomaly = self.mean_anomaly_deg.to_radians() + self.mean_motion_rad_s() * dt_seconds;
        let ecc_anomaly = solve_kepler(mean_anomaly, e);
        let true_anomaly = eccentric_to_true_anomaly(ecc_anomaly, e);
        let r = self.semi_major_axis_km * (1.0 - e * ecc_anomaly.cos());

        let x_orb = r * true_anomaly.cos();
        let y_orb = r * true_anomaly.sin();

        let (sin_o, cos_o) = raan.sin_cos();
        let (sin_w, cos_w) = argp.sin_cos();
        let (sin_i, cos_i) = i.sin_cos();

        Vector3::new(
            (cos_o * cos_w - sin_o * sin_w * cos_i) * x_orb
                + (-cos_o * sin_w - sin_o * cos_w * cos_i) * y_orb,
            (sin_o * cos_w + cos_o * sin_w * cos_i) * x_orb
                + (-sin_o * sin_w + cos_o * cos_w * cos_i) * y_orb,
            (sin_w * sin_i) * x_orb + (cos_w * sin_i) * y_orb,
        )
    }
}

pub fn altitude_to_radius(altitude_km: f64) -> f64 {
    altitude_km + EARTH_RADIUS_KM
}

/// Solve Kepler's equation `M = E - e·sin(E)` for the eccentric anomaly (Newton iteration)
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut e_anom = mean_anomaly;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (e_anom - eccentricity * e_anom.sin() - mean_anomaly)
            / (1.0 - eccentricity * e_anom.cos());
        e_anom -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    e_anom
}

pub fn eccentric_to_true_anomaly(ecc_anomaly: f64, eccentricity: f64) -> f64 {
    let denom = 1.0 - eccentricity * ecc_anomaly.cos();
    let sin_v = (1.0 - eccentricity * eccentricity).sqrt() * ecc_anomaly.sin() / denom;
    let cos_v = (ecc_anomaly.cos() - eccentricity) / denom;
    sin_v.atan2(cos_v)
}

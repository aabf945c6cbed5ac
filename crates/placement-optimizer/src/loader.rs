//! Snapshot loading from JSON files
//!
//! Files hold either a bare array of records or an object wrapping the array
//! (`{"debris": [...]}`, `{"facilities": [...]}`). Records that fail to parse
//! or validate are skipped and counted, not fatal.

use crate::{OptimizerError, Result};
use debris_coverage::{Debris, Facility, FacilityLocation};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

/// Keep ids to alphanumerics, dash and underscore, at most 128 chars
fn sanitize_id(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(128)
        .collect()
}

fn read_records(path: &Path, key: &str) -> Result<Vec<Value>> {
    let reader = BufReader::new(File::open(path)?);
    let raw: Value = serde_json::from_reader(reader)?;

    match raw {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(OptimizerError::InvalidParameter(format!(
                "{} has no {:?} array",
                path.display(),
                key
            ))),
        },
        _ => Err(OptimizerError::InvalidParameter(format!(
            "{} is neither an array nor an object",
            path.display()
        ))),
    }
}

fn parse_each<T, F>(records: Vec<Value>, kind: &str, mut accept: F) -> (Vec<T>, usize)
where
    T: DeserializeOwned,
    F: FnMut(T) -> std::result::Result<T, String>,
{
    let mut out = Vec::new();
    let mut skipped = 0;

    for (i, record) in records.into_iter().enumerate() {
        let parsed = serde_json::from_value::<T>(record)
            .map_err(|e| e.to_string())
            .and_then(&mut accept);
        match parsed {
            Ok(item) => out.push(item),
            Err(reason) => {
                warn!("Skipping {} record {}: {}", kind, i, reason);
                skipped += 1;
            }
        }
    }
    (out, skipped)
}

/// Load a debris snapshot. Order is preserved; inactive debris is kept so the
/// caller decides how to filter.
pub fn load_debris(path: impl AsRef<Path>) -> Result<Vec<Debris>> {
    let path = path.as_ref();
    info!("Loading debris from {:?}", path);

    let records = read_records(path, "debris")?;
    let (debris, skipped) = parse_each(records, "debris", |mut d: Debris| {
        d.id = sanitize_id(&d.id);
        if d.id.is_empty() {
            return Err("empty id".to_string());
        }
        d.validate().map_err(|e| e.to_string())?;
        Ok(d)
    });

    info!("Loaded {} debris ({} skipped)", debris.len(), skipped);
    Ok(debris)
}

/// Load existing facilities. Missing monitoring capabilities are filled in
/// from the facility-type catalog.
pub fn load_facilities(path: impl AsRef<Path>) -> Result<Vec<Facility>> {
    let path = path.as_ref();
    info!("Loading facilities from {:?}", path);

    let records = read_records(path, "facilities")?;
    let (facilities, skipped) = parse_each(records, "facility", |mut f: Facility| {
        f.id = sanitize_id(&f.id);
        if f.id.is_empty() {
            return Err("empty id".to_string());
        }
        if let FacilityLocation::Ground { latitude, longitude } = f.location {
            if !is_valid_latitude(latitude) || !is_valid_longitude(longitude) {
                return Err(format!("coordinates out of range ({latitude}, {longitude})"));
            }
        }
        if f.monitoring.is_none() {
            f.monitoring = f.facility_type.definition().monitoring;
        }
        f.validate().map_err(|e| e.to_string())?;
        Ok(f)
    });

    info!("Loaded {} facilities ({} skipped)", facilities.len(), skipped);
    Ok(facilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use debris_coverage::{DebrisStatus, FacilityType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const ORBIT: &str = r#"{"semiMajorAxis": 7171.0, "eccentricity": 0.001, "inclination": 98.0,
        "raan": 0.0, "argumentOfPeriapsis": 0.0, "meanAnomaly": 0.0, "epoch": "2024-01-01T00:00:00Z"}"#;

    #[test]
    fn test_load_debris_skips_invalid_records() {
        let json = format!(
            r#"[
                {{"id": "deb-1", "orbit": {ORBIT}, "physical": {{"size": "large"}}, "status": "active"}},
                {{"id": "deb 2!", "orbit": {ORBIT}, "physical": {{"size": "small", "type": "fragment"}}, "status": "removed"}},
                {{"id": "no-orbit", "physical": {{"size": "small"}}, "status": "active"}},
                {{"id": "bad-orbit", "orbit": {{"semiMajorAxis": -5.0, "eccentricity": 0.0, "inclination": 0.0,
                    "raan": 0.0, "argumentOfPeriapsis": 0.0, "meanAnomaly": 0.0}}, "physical": {{"size": "small"}}, "status": "active"}}
            ]"#
        );
        let file = write_temp(&json);

        let debris = load_debris(file.path()).unwrap();
        assert_eq!(debris.len(), 2);
        assert_eq!(debris[0].id, "deb-1");
        assert!((debris[0].altitude_km() - 800.0).abs() < 1e-9);
        assert_eq!(debris[1].id, "deb2");
        assert_eq!(debris[1].status, DebrisStatus::Removed);
    }

    #[test]
    fn test_load_debris_from_wrapped_object() {
        let json = format!(
            r#"{{"debris": [{{"id": "d", "orbit": {ORBIT}, "physical": {{"size": "medium"}}, "status": "active"}}]}}"#
        );
        let file = write_temp(&json);
        assert_eq!(load_debris(file.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_load_rejects_unknown_shape() {
        let file = write_temp(r#"{"satellites": []}"#);
        assert!(matches!(
            load_debris(file.path()),
            Err(OptimizerError::InvalidParameter(_))
        ));
        let file = write_temp("42");
        assert!(load_facilities(file.path()).is_err());
    }

    #[test]
    fn test_load_facilities_fills_catalog_monitoring() {
        let json = r#"{"facilities": [
            {"id": "fac-1", "type": "radar_cband", "name": "Kwajalein",
             "location": {"type": "ground", "latitude": 9.4, "longitude": 167.5}, "status": "operational"},
            {"id": "fac-2", "type": "radar_sband", "name": "Nowhere",
             "location": {"type": "ground", "latitude": 123.0, "longitude": 0.0}, "status": "operational"},
            {"id": "fac-3", "type": "warp_drive", "name": "Fiction",
             "location": {"type": "ground", "latitude": 0.0, "longitude": 0.0}, "status": "operational"}
        ]}"#;
        let file = write_temp(json);

        let facilities = load_facilities(file.path()).unwrap();
        assert_eq!(facilities.len(), 1);
        assert_eq!(facilities[0].facility_type, FacilityType::RadarCband);
        let monitoring = facilities[0].monitoring.unwrap();
        assert_eq!(monitoring.max_altitude_km, 20000.0);
        assert!(facilities[0].is_operational());
    }

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("abc-123_x"), "abc-123_x");
        assert_eq!(sanitize_id("a b;c"), "abc");
        assert_eq!(sanitize_id(&"x".repeat(300)).len(), 128);
    }
}

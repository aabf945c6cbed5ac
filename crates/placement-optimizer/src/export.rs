//! GeoJSON export of a placement

use crate::{CandidateLocation, FacilityCandidate, SetCoverResult};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// One feature per selected candidate. Ground sites are points; orbital
/// candidates carry no geometry and describe their orbit in properties.
pub fn to_geojson(result: &SetCoverResult, candidates: &[FacilityCandidate]) -> FeatureCollection {
    let features = candidates
        .iter()
        .filter(|c| result.selected_candidates.contains(&c.id))
        .map(feature_for)
        .collect();

    let mut metadata = JsonObject::new();
    metadata.insert("mode".into(), json!(result.details.mode));
    metadata.insert("feasible".into(), json!(result.feasible));
    metadata.insert("totalCost".into(), json!(result.total_cost));
    metadata.insert("coverage".into(), json!(result.coverage));
    metadata.insert("solvedAt".into(), json!(result.details.solved_at.to_rfc3339()));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(metadata),
    }
}

fn feature_for(candidate: &FacilityCandidate) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("name".into(), json!(candidate.name()));
    properties.insert("type".into(), json!(candidate.facility_type));
    properties.insert("cost".into(), json!(candidate.cost));
    properties.insert("covers".into(), json!(candidate.covered_count()));

    let geometry = match &candidate.location {
        CandidateLocation::Ground { latitude, longitude, .. } => {
            Some(Geometry::new(Value::Point(vec![*longitude, *latitude])))
        }
        CandidateLocation::Space { altitude_km, inclination_deg, .. } => {
            properties.insert("altitudeKm".into(), json!(altitude_km));
            properties.insert("inclinationDeg".into(), json!(inclination_deg));
            None
        }
    };

    Feature {
        bbox: None,
        geometry,
        id: Some(Id::String(candidate.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

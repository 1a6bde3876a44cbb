use std::collections::HashMap;

use crate::model::feature::{Feature, Geometry};
use crate::model::tags::Tags;

/// class-specific precedence level 1 (§4.2). returns `None` for classes with
/// no override, so the caller falls through to the static table.
pub fn class_override(feature: &Feature, building_types: &HashMap<String, Tags>) -> Option<Tags> {
    match feature.class.to_string().as_str() {
        "ElvBekk" => Some(classify_elvbekk(feature)),
        "Bygning" => Some(classify_bygning(feature, building_types)),
        "Lufthavn" => Some(classify_lufthavn(feature)),
        "SportIdrettPlass" => Some(classify_sport_idrett_plass(feature)),
        _ => None,
    }
}

/// narrow rivers are mapped as a stream centreline; wide ones as a tagged
/// riverbank polygon (§4.2).
fn classify_elvbekk(feature: &Feature) -> Tags {
    let mut t = Tags::new();
    match &feature.geometry {
        Geometry::LineString(_) => {
            t.set("waterway", "stream");
        }
        Geometry::Polygon { .. } => {
            t.set("natural", "water");
            t.set("water", "river");
            let width: Option<f64> = feature.extras.get("bredde").and_then(|s| s.parse().ok());
            match width {
                Some(w) if w < 2.0 => t.set("waterway", "stream"),
                _ => t.set("waterway", "riverbank"),
            }
        }
        Geometry::Point(_) => {}
    }
    t
}

/// drills into the building sub-code table and the hut-ownership code
/// (§4.2): unknown sub-codes fall back to a bare `building=yes`.
fn classify_bygning(feature: &Feature, building_types: &HashMap<String, Tags>) -> Tags {
    let mut t = match feature.extras.get("bygningstype").and_then(|code| building_types.get(code)) {
        Some(known) => known.clone(),
        None => {
            let mut fallback = Tags::new();
            fallback.set("building", "yes");
            fallback
        }
    };

    if let Some(owner) = feature.extras.get("eierform") {
        match owner.as_str() {
            // private cabin ownership overrides the generic building table entry
            "P" | "Privat" => t.set("building", "cabin"),
            "O" | "Offentlig" => t.set("access", "yes"),
            _ => {}
        }
    }
    t
}

/// distinguishes heliport vs. airfield and lifts IATA/ICAO codes (§4.2).
fn classify_lufthavn(feature: &Feature) -> Tags {
    let mut t = Tags::new();
    match feature.extras.get("lufthavntype").map(String::as_str) {
        Some("H") | Some("Helikopter") => t.set("aeroway", "heliport"),
        _ => t.set("aeroway", "aerodrome"),
    }
    if let Some(iata) = feature.extras.get("iata") {
        t.set("iata", iata.clone());
    }
    if let Some(icao) = feature.extras.get("icao") {
        t.set("icao", icao.clone());
    }
    t
}

/// a `SportIdrettPlass` area with holes is a running-track pitch (§4.2).
fn classify_sport_idrett_plass(feature: &Feature) -> Tags {
    let mut t = Tags::new();
    t.set("leisure", "pitch");
    if !feature.inner_rings().is_empty() {
        t.set("sport", "running");
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::class::ObjectClass;
    use crate::model::feature::FeatureId;
    use crate::model::node::Node;

    fn feature_with_holes(has_holes: bool) -> Feature {
        let outer = vec![Node::new(0.0, 0.0), Node::new(0.0, 10.0), Node::new(10.0, 10.0), Node::new(10.0, 0.0), Node::new(0.0, 0.0)];
        let inners = if has_holes {
            vec![vec![Node::new(4.0, 4.0), Node::new(4.0, 6.0), Node::new(6.0, 6.0), Node::new(6.0, 4.0), Node::new(4.0, 4.0)]]
        } else {
            vec![]
        };
        Feature::new(FeatureId(0), ObjectClass::SportIdrettPlass, Geometry::Polygon { outer, inners })
    }

    #[test]
    fn sport_area_with_hole_is_running_track() {
        let t = classify_sport_idrett_plass(&feature_with_holes(true));
        assert_eq!(t.get("sport"), Some("running"));
    }

    #[test]
    fn sport_area_without_hole_is_plain_pitch() {
        let t = classify_sport_idrett_plass(&feature_with_holes(false));
        assert_eq!(t.get("sport"), None);
    }

    #[test]
    fn elvbekk_linestring_is_stream() {
        let f = Feature::new(FeatureId(0), ObjectClass::ElvBekk, Geometry::LineString(vec![Node::new(0.0, 0.0), Node::new(1.0, 1.0)]));
        let t = classify_elvbekk(&f);
        assert_eq!(t.get("waterway"), Some("stream"));
    }

    #[test]
    fn bygning_with_unknown_subcode_falls_back_to_building_yes() {
        let mut f = Feature::new(FeatureId(0), ObjectClass::Bygning, Geometry::Point(Node::new(0.0, 0.0)));
        f.extras.insert("bygningstype".to_string(), "999999".to_string());
        let t = classify_bygning(&f, &HashMap::new());
        assert_eq!(t.get("building"), Some("yes"));
    }
}

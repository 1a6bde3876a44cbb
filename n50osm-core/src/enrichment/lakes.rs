//! the NVE lake overlay (§4.7). `n50osm-cli`'s client pages through the
//! lakes service and hands this module the already-decoded [`LakeRecord`]
//! set; this function only does the matching and tagging.

use crate::model::class::ObjectClass;
use crate::model::feature::FeatureId;
use crate::model::lake::LakeRecord;
use crate::store::Store;

/// area above which a matched lake gets `water=lake` regardless of its N50
/// class (§4.7).
const NVE_WATER_LAKE_AREA_M2: f64 = 1_000_000.0;

fn is_lake(class: &ObjectClass) -> bool {
    matches!(class, ObjectClass::Innsjø | ObjectClass::InnsjøRegulert)
}

/// overlays NVE lake attributes onto every live lake feature carrying a
/// `ref:nve:vann` reference (set during Classify's property lift, §4.2).
/// should run before [`super::names::enrich_names`] within Enrichment,
/// since its name disambiguation rule 1 keys off a `name` tag this pass may
/// already have set.
pub fn enrich_lakes(store: &mut Store, lakes: &[LakeRecord]) {
    if lakes.is_empty() {
        return;
    }
    let ids: Vec<FeatureId> = store.live_feature_ids().filter(|&id| is_lake(&store.feature(id).class)).collect();

    for id in ids {
        let Some(nve_ref) = store.feature(id).tags.get("ref:nve:vann").map(str::to_string) else {
            continue;
        };
        let Some(lake) = lakes.iter().find(|l| l.nve_ref == nve_ref) else {
            continue;
        };

        let feature = store.feature_mut(id);
        if let Some(name) = &lake.name {
            feature.tags.set("name", name.clone());
        }
        if let Some(ele) = lake.ele {
            feature.tags.set_if_absent("ele", format!("{}", ele.round() as i64));
        }
        if lake.area_km2 * 1_000_000.0 > NVE_WATER_LAKE_AREA_M2 {
            feature.tags.set_if_absent("water", "lake");
        }
        if let Some(magazine_id) = &lake.magazine_id {
            feature.tags.set("ref:nve:magasin", magazine_id.clone());
        }
        feature.extras.insert("nve_areal".to_string(), format!("{}", lake.area_km2 * 1_000_000.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::feature::Geometry;
    use crate::model::node::Node;

    fn lake_feature(store: &mut Store, nve_ref: &str) -> FeatureId {
        let id = store.push_feature(
            ObjectClass::Innsjø,
            Geometry::Polygon { outer: vec![Node::new(0.0, 0.0), Node::new(0.0, 1.0), Node::new(1.0, 0.0), Node::new(0.0, 0.0)], inners: vec![] },
        );
        store.feature_mut(id).tags.set("ref:nve:vann", nve_ref);
        id
    }

    #[test]
    fn matched_lake_gets_name_elevation_and_area_extra() {
        let mut store = Store::new();
        let id = lake_feature(&mut store, "12345");
        let lakes = vec![LakeRecord { nve_ref: "12345".to_string(), name: Some("Testvatnet".to_string()), ele: Some(120.4), area_km2: 0.2, magazine_id: None }];
        enrich_lakes(&mut store, &lakes);
        assert_eq!(store.feature(id).tags.get("name"), Some("Testvatnet"));
        assert_eq!(store.feature(id).tags.get("ele"), Some("120"));
        assert_eq!(store.feature(id).extras.get("nve_areal"), Some(&"200000".to_string()));
        assert_eq!(store.feature(id).tags.get("water"), None);
    }

    #[test]
    fn large_lake_gets_water_lake_tag() {
        let mut store = Store::new();
        let id = lake_feature(&mut store, "99");
        let lakes = vec![LakeRecord { nve_ref: "99".to_string(), name: None, ele: None, area_km2: 1.5, magazine_id: Some("M1".to_string()) }];
        enrich_lakes(&mut store, &lakes);
        assert_eq!(store.feature(id).tags.get("water"), Some("lake"));
        assert_eq!(store.feature(id).tags.get("ref:nve:magasin"), Some("M1"));
    }

    #[test]
    fn lake_at_exactly_one_square_km_is_not_tagged() {
        let mut store = Store::new();
        let id = lake_feature(&mut store, "100");
        let lakes = vec![LakeRecord { nve_ref: "100".to_string(), name: None, ele: None, area_km2: 1.0, magazine_id: None }];
        enrich_lakes(&mut store, &lakes);
        assert_eq!(store.feature(id).tags.get("water"), None);
    }

    #[test]
    fn large_reservoir_keeps_its_water_subtype() {
        let mut store = Store::new();
        let id = store.push_feature(
            ObjectClass::InnsjøRegulert,
            Geometry::Polygon { outer: vec![Node::new(0.0, 0.0), Node::new(0.0, 1.0), Node::new(1.0, 0.0), Node::new(0.0, 0.0)], inners: vec![] },
        );
        store.feature_mut(id).tags.set("ref:nve:vann", "55");
        store.feature_mut(id).tags.set("water", "reservoir");
        let lakes = vec![LakeRecord { nve_ref: "55".to_string(), name: None, ele: None, area_km2: 2.0, magazine_id: None }];
        enrich_lakes(&mut store, &lakes);
        assert_eq!(store.feature(id).tags.get("water"), Some("reservoir"));
    }

    #[test]
    fn existing_elevation_is_not_overwritten() {
        let mut store = Store::new();
        let id = lake_feature(&mut store, "7");
        store.feature_mut(id).tags.set("ele", "50");
        let lakes = vec![LakeRecord { nve_ref: "7".to_string(), name: None, ele: Some(999.0), area_km2: 0.01, magazine_id: None }];
        enrich_lakes(&mut store, &lakes);
        assert_eq!(store.feature(id).tags.get("ele"), Some("50"));
    }

    #[test]
    fn unmatched_reference_is_left_untouched() {
        let mut store = Store::new();
        let id = lake_feature(&mut store, "no-match");
        enrich_lakes(&mut store, &[]);
        assert_eq!(store.feature(id).tags.get("name"), None);
    }
}

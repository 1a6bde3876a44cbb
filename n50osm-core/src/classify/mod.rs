pub mod building_types;
mod overrides;
mod property_lift;
mod static_tags;

use std::collections::{BTreeSet, HashMap};

use crate::model::class::ObjectClass;
use crate::model::feature::Feature;
use crate::model::segment::Segment;
use crate::model::tags::Tags;

#[derive(Default)]
pub struct ClassifierTables {
    pub building_types: HashMap<String, Tags>,
}

/// classifies every feature and segment in place, accumulating unknown
/// classes into `missing` (§4.2, §7 class 5: reported, never fatal).
pub fn classify_all(store: &mut crate::store::Store, tables: &ClassifierTables) -> BTreeSet<String> {
    let mut missing = BTreeSet::new();
    for id in store.live_feature_ids().collect::<Vec<_>>() {
        let feature = store.feature_mut(id);
        classify_feature(feature, tables, &mut missing);
    }
    for segment in &mut store.segments {
        classify_segment(segment, &mut missing);
    }
    missing
}

pub fn classify_feature(feature: &mut Feature, tables: &ClassifierTables, missing: &mut BTreeSet<String>) {
    let mut tags = match overrides::class_override(feature, &tables.building_types) {
        Some(t) => t,
        None => static_tags::static_tags(&feature.class),
    };
    property_lift::lift_properties(feature, &mut tags);

    if tags.is_empty() && is_unclassified(&feature.class) {
        missing.insert(feature.class.to_string());
    }
    feature.tags.extend(&tags);
}

pub fn classify_segment(segment: &mut Segment, missing: &mut BTreeSet<String>) {
    let tags = static_tags::static_tags(&segment.class);
    if tags.is_empty() && is_unclassified(&segment.class) {
        missing.insert(segment.class.to_string());
    }
    segment.tags.extend(&tags);
}

/// GML attribute leaves `--tag` mode never echoes as `N50_*` tags, since
/// they churn on every re-export without describing the feature itself.
const RAW_TAG_AVOID_KEYS: &[&str] = &["oppdateringsdato", "datafangstdato", "målemetode", "nøyaktighet"];

/// `--tag` mode (§4.2 precedence level 4): copies every remaining raw GML
/// attribute onto the feature or segment as `N50_<key>`, skipping
/// [`RAW_TAG_AVOID_KEYS`] and the `gml_class` bookkeeping entry ingest adds.
pub fn tag_raw_attributes(store: &mut crate::store::Store) {
    for id in store.live_feature_ids().collect::<Vec<_>>() {
        let feature = store.feature_mut(id);
        let raw: Vec<(String, String)> = feature
            .extras
            .iter()
            .filter(|(k, _)| k.as_str() != "gml_class" && !RAW_TAG_AVOID_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (k, v) in raw {
            feature.tags.set(format!("N50_{k}"), v);
        }
    }
    for segment in &mut store.segments {
        let raw: Vec<(String, String)> = segment
            .tags
            .iter()
            .filter_map(|(k, v)| k.strip_prefix("n50_raw:").map(|key| (key.to_string(), v.to_string())))
            .filter(|(k, _)| !RAW_TAG_AVOID_KEYS.contains(&k.as_str()))
            .collect();
        for (k, v) in raw {
            segment.tags.set(format!("N50_{k}"), v);
        }
    }
}

/// classes that are *expected* to carry no tags of their own (auxiliary
/// boundary helpers, fabricated classes, terrain points) should not pollute
/// the missing-classification report.
fn is_unclassified(class: &ObjectClass) -> bool {
    !(class.is_auxiliary()
        || matches!(
            class,
            ObjectClass::Havflate | ObjectClass::Øy | ObjectClass::KantUtsnitt | ObjectClass::Terrengpunkt
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::feature::{FeatureId, Geometry};
    use crate::model::node::Node;

    #[test]
    fn unknown_class_is_reported_but_not_fatal() {
        let mut f = Feature::new(FeatureId(0), ObjectClass::Other("NoeUkjent".into()), Geometry::Point(Node::new(0.0, 0.0)));
        let mut missing = BTreeSet::new();
        classify_feature(&mut f, &ClassifierTables::default(), &mut missing);
        assert!(missing.contains("NoeUkjent"));
    }

    #[test]
    fn known_class_is_not_reported() {
        let mut f = Feature::new(FeatureId(0), ObjectClass::Innsjø, Geometry::Point(Node::new(0.0, 0.0)));
        let mut missing = BTreeSet::new();
        classify_feature(&mut f, &ClassifierTables::default(), &mut missing);
        assert!(missing.is_empty());
        assert_eq!(f.tags.get("water"), Some("lake"));
    }
}

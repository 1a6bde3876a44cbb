//! SSR place-name enrichment (§4.7). For every candidate feature this
//! intersects the feature's bounding box (Points get a 500m perimeter) with
//! the municipality's loaded [`PlaceRecord`] set, filters to the category's
//! preferred `ssr:type` list, and resolves ties with the three-step
//! disambiguation rule.

use crate::geo::primitives::{point_in_multipolygon, BBox};
use crate::model::class::ObjectClass;
use crate::model::feature::{Feature, FeatureId, Geometry};
use crate::model::place::PlaceRecord;
use crate::store::Store;

/// radius a Point feature's bbox is grown by before intersecting with names
/// (§4.7).
const POINT_PERIMETER_M: f64 = 500.0;

/// one name category: the N50 classes it applies to, and its ordered
/// `ssr:type` preference list (index 0 = most preferred).
pub struct NameCategory {
    pub key: &'static str,
    pub classes: &'static [ObjectClass],
    pub ssr_type_preference: &'static [&'static str],
}

/// the island category plus the six further categories SPEC_FULL carries
/// over from the source data (§4.7): glaciers, wetlands, cemeteries,
/// winter-sports pistes, dams, waterfalls.
pub fn default_categories() -> Vec<NameCategory> {
    vec![
        NameCategory {
            key: "island",
            classes: &[ObjectClass::Øy, ObjectClass::Skjær],
            ssr_type_preference: &["øyISjø", "øygruppeISjø", "holmeISjø", "skjærISjø", "øy", "øygruppe", "holme", "skjær"],
        },
        NameCategory {
            key: "glacier",
            classes: &[ObjectClass::SnøIsbre],
            ssr_type_preference: &["isbre", "fonn", "iskuppel"],
        },
        NameCategory {
            key: "wetland",
            classes: &[ObjectClass::Myr],
            ssr_type_preference: &["myr", "våtmarksområde"],
        },
        NameCategory {
            key: "cemetery",
            classes: &[ObjectClass::Gravplass],
            ssr_type_preference: &["gravplass"],
        },
        NameCategory {
            key: "piste",
            classes: &[ObjectClass::Alpinbakke, ObjectClass::Skitrekk],
            ssr_type_preference: &["alpinanlegg", "skiheis"],
        },
        NameCategory {
            key: "dam",
            classes: &[ObjectClass::Dam],
            ssr_type_preference: &["dam"],
        },
        NameCategory {
            key: "waterfall",
            classes: &[ObjectClass::Foss],
            ssr_type_preference: &["foss", "stryk"],
        },
    ]
}

/// splits a (possibly multi-language, `;`-joined) name string into its
/// component candidates, further splitting each component on `" - "`
/// (§4.7, §9: "preserve both the split rule (on `;` and on `" - "`)").
fn split_name(name: &str) -> Vec<String> {
    name.split(';')
        .flat_map(|part| part.split(" - "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn feature_bbox(feature: &Feature) -> BBox {
    match &feature.geometry {
        Geometry::Point(n) => BBox::of(&[*n]).expanded_by(POINT_PERIMETER_M),
        Geometry::LineString(coords) => BBox::of(coords),
        Geometry::Polygon { outer, .. } => BBox::of(outer),
    }
}

fn point_inside(feature: &Feature, coord: crate::model::node::Node) -> bool {
    match &feature.geometry {
        Geometry::Point(_) => true, // bbox test already did the work for points
        Geometry::LineString(_) => true,
        Geometry::Polygon { outer, inners } => point_in_multipolygon(coord, outer, inners),
    }
}

struct Candidate<'a> {
    record: &'a PlaceRecord,
    rank: usize,
}

fn candidates<'a>(feature: &Feature, places: &'a [PlaceRecord], category: &NameCategory) -> Vec<Candidate<'a>> {
    let bbox = feature_bbox(feature);
    let mut out: Vec<Candidate> = places
        .iter()
        .filter_map(|p| {
            let rank = category.ssr_type_preference.iter().position(|&t| t == p.ssr_type)?;
            if !bbox.contains_point(p.coordinate) || !point_inside(feature, p.coordinate) {
                return None;
            }
            Some(Candidate { record: p, rank })
        })
        .collect();
    out.sort_by_key(|c| c.rank);
    out
}

/// applies the §4.7 disambiguation rules to one feature/category pair.
fn disambiguate(feature: &mut Feature, candidates: &[Candidate]) {
    if candidates.is_empty() {
        return;
    }

    if let Some(existing) = feature.tags.get("name").map(str::to_string) {
        let existing_parts = split_name(&existing);
        let mut matched: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| split_name(&c.record.name).iter().any(|p| existing_parts.contains(p)))
            .collect();
        if !matched.is_empty() {
            matched.sort_by_key(|c| c.rank);
            let chosen = matched[0];
            feature.tags.set("ref:ssr", chosen.record.ssr_id.clone());
            if matched.len() > 1 {
                let alts: Vec<String> = matched[1..].iter().map(|c| c.record.name.clone()).collect();
                feature.tags.set("fixme", format!("multiple SSR records match existing name: {}", alts.join(", ")));
            }
            return;
        }
    }

    let top_strictly_preferred = candidates.len() == 1 || candidates[0].rank < candidates[1].rank;
    if top_strictly_preferred {
        let chosen = &candidates[0];
        if let Some(prev) = feature.tags.get("name") {
            if prev != chosen.record.name {
                feature.tags.set("fixme", format!("NVE suggested alternative name '{prev}'"));
            }
        }
        feature.tags.set("name", chosen.record.name.clone());
        feature.tags.set("ref:ssr", chosen.record.ssr_id.clone());
    } else {
        let alts: Vec<String> = candidates.iter().map(|c| c.record.name.clone()).collect();
        feature.tags.set("fixme", format!("choose a name between alternatives: {}", alts.join(", ")));
    }
}

/// runs place-name enrichment for every category over every live feature
/// (§4.7). should run after the NVE lake overlay within Enrichment, since
/// rule 1 keys off a `name` tag NVE may already have set.
pub fn enrich_names(store: &mut Store, places: &[PlaceRecord], categories: &[NameCategory]) {
    if places.is_empty() {
        return;
    }
    let ids: Vec<FeatureId> = store.live_feature_ids().collect();
    for id in ids {
        for category in categories {
            if !category.classes.contains(&store.feature(id).class) {
                continue;
            }
            let cands = candidates(store.feature(id), places, category);
            disambiguate(store.feature_mut(id), &cands);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Node;

    fn island_feature() -> Feature {
        let outer = vec![
            Node::new(0.0, 0.0),
            Node::new(0.0, 1.0),
            Node::new(1.0, 1.0),
            Node::new(1.0, 0.0),
            Node::new(0.0, 0.0),
        ];
        Feature::new(crate::model::feature::FeatureId(0), ObjectClass::Øy, Geometry::Polygon { outer, inners: vec![] })
    }

    fn record(name: &str, ssr_type: &str, ssr_id: &str, coord: Node) -> PlaceRecord {
        PlaceRecord { coordinate: coord, name: name.to_string(), ssr_type: ssr_type.to_string(), ssr_id: ssr_id.to_string() }
    }

    #[test]
    fn single_candidate_is_adopted() {
        let mut f = island_feature();
        let places = vec![record("Testøya", "øy", "1001", Node::new(0.5, 0.5))];
        let cands = candidates(&f, &places, &default_categories()[0]);
        disambiguate(&mut f, &cands);
        assert_eq!(f.tags.get("name"), Some("Testøya"));
        assert_eq!(f.tags.get("ref:ssr"), Some("1001"));
    }

    #[test]
    fn equal_rank_candidates_are_ambiguous() {
        let mut f = island_feature();
        let places = vec![
            record("Alfa", "øy", "1", Node::new(0.3, 0.3)),
            record("Beta", "øy", "2", Node::new(0.7, 0.7)),
        ];
        let cands = candidates(&f, &places, &default_categories()[0]);
        disambiguate(&mut f, &cands);
        assert_eq!(f.tags.get("name"), None);
        assert!(f.tags.get("fixme").unwrap().contains("Alfa"));
        assert!(f.tags.get("fixme").unwrap().contains("Beta"));
    }

    #[test]
    fn existing_nve_name_matching_a_candidate_keeps_the_nve_string() {
        let mut f = island_feature();
        f.tags.set("name", "Kalvøya - Calf Island");
        let places = vec![record("Kalvøya", "øy", "42", Node::new(0.5, 0.5))];
        let cands = candidates(&f, &places, &default_categories()[0]);
        disambiguate(&mut f, &cands);
        assert_eq!(f.tags.get("name"), Some("Kalvøya - Calf Island"));
        assert_eq!(f.tags.get("ref:ssr"), Some("42"));
    }

    #[test]
    fn preferred_rank_wins_over_runner_up() {
        let mut f = island_feature();
        let places = vec![
            record("Storholmen", "holme", "2", Node::new(0.6, 0.6)),
            record("Storøya", "øy", "1", Node::new(0.4, 0.4)),
        ];
        let cands = candidates(&f, &places, &default_categories()[0]);
        disambiguate(&mut f, &cands);
        assert_eq!(f.tags.get("name"), Some("Storøya"));
    }
}

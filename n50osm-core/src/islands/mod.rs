use std::collections::{BTreeSet, HashMap};

use crate::geo::primitives::{signed_area, ISLAND_AREA_M2};
use crate::model::class::ObjectClass;
use crate::model::feature::{Feature, FeatureId, Geometry};
use crate::model::segment::SegmentId;
use crate::store::Store;

/// `place=island` at `|area| >= island_area_m2`, else `place=islet` (§4.4,
/// §8 boundary case: the threshold is inclusive). `island_area_m2` defaults
/// to [`ISLAND_AREA_M2`] but is threaded through from `RunConfig` (§3) so it
/// can be overridden for testing.
fn place_tag(area_m2: f64, island_area_m2: f64) -> &'static str {
    if area_m2.abs() >= island_area_m2 {
        "island"
    } else {
        "islet"
    }
}

fn member_set(members: &[SegmentId]) -> BTreeSet<SegmentId> {
    members.iter().copied().collect()
}

/// runs both detection phases and deletes sea-face features (§4.4). must
/// run after the Polygon Decomposer, since both phases reason about ring
/// membership.
pub fn detect_islands(store: &mut Store, island_area_m2: f64) {
    phase_a_inner_rings(store, island_area_m2);
    phase_b_coastline_chains(store, island_area_m2);
    store.delete_features_where(|f| f.class.is_sea());
}

/// index of single-ring polygon features whose one ring is entirely
/// water-edge segments, keyed by that ring's member set — Phase A's
/// "lookalike" feature lookup (§4.4).
fn build_lookalike_index(store: &Store) -> HashMap<BTreeSet<SegmentId>, FeatureId> {
    let mut index = HashMap::new();
    for id in store.live_feature_ids() {
        let f = store.feature(id);
        if f.members.len() != 1 {
            continue;
        }
        let ring_members = &f.members[0];
        if ring_members.is_empty() {
            continue;
        }
        let all_water_edges = ring_members.iter().all(|&sid| store.segment(sid).class.is_water_edge());
        if all_water_edges {
            index.insert(member_set(ring_members), id);
        }
    }
    index
}

fn phase_a_inner_rings(store: &mut Store, island_area_m2: f64) {
    let lookalikes = build_lookalike_index(store);

    let water_body_ids: Vec<FeatureId> = store
        .live_feature_ids()
        .filter(|id| store.feature(*id).class.is_water_body())
        .collect();

    for fid in water_body_ids {
        // snapshot everything needed out of the borrow before any mutation,
        // since each ring below may push a new feature or mutate a segment.
        let rings: Vec<(Vec<crate::model::node::Node>, Vec<SegmentId>)> = {
            let feature = store.feature(fid);
            let inner_count = feature.inner_rings().len();
            (1..=inner_count)
                .map(|ring_idx| (feature.inner_rings()[ring_idx - 1].clone(), feature.members.get(ring_idx).cloned().unwrap_or_default()))
                .collect()
        };

        for (ring_coords, ring_members) in rings {
            if ring_members.is_empty() {
                continue;
            }
            if ring_members.iter().any(|&sid| store.segment(sid).class.is_intermittent_edge()) {
                continue;
            }
            let area = signed_area(&ring_coords);
            let tag = place_tag(area, island_area_m2);

            if ring_members.len() == 1 {
                store.segment_mut(ring_members[0]).tags.set("place", tag);
            } else if let Some(&target) = lookalikes.get(&member_set(&ring_members)) {
                store.feature_mut(target).tags.set("place", tag);
            } else {
                let new_id = store.push_feature(ObjectClass::Øy, Geometry::Polygon { outer: ring_coords, inners: vec![] });
                let f = store.feature_mut(new_id);
                f.members = vec![ring_members];
                f.tags.set("place", tag);
            }
        }
    }
}

/// candidate segments for Phase B: coastline-like segments on the outer
/// ring of a water body whose outer ring also contains a separator (§4.4,
/// §9 open question: this filter misses islands fully enclosed in a lake
/// with no separator edge, which Phase A already covers).
fn phase_b_candidates(store: &Store) -> Vec<SegmentId> {
    let mut out = Vec::new();
    for id in store.live_feature_ids() {
        let f = store.feature(id);
        if !f.class.is_water_body() || f.members.is_empty() {
            continue;
        }
        let outer_members = &f.members[0];
        let has_separator = outer_members.iter().any(|&sid| store.segment(sid).class.is_sea_separator());
        if !has_separator {
            continue;
        }
        for &sid in outer_members {
            if store.segment(sid).class.is_coastline_like() {
                out.push(sid);
            }
        }
    }
    out.sort();
    out.dedup();
    out
}

fn phase_b_coastline_chains(store: &mut Store, island_area_m2: f64) {
    let mut pool: Vec<SegmentId> = phase_b_candidates(store);
    let mut existing_by_members = build_island_relation_index(store);

    while let Some(seed) = pool.pop() {
        let mut chain = vec![seed];
        loop {
            let last_node = store.segment(*chain.last().unwrap()).last();
            let first_node = store.segment(chain[0]).first();
            if last_node == first_node {
                break; // closed
            }
            let Some(pos) = pool.iter().position(|&sid| store.segment(sid).first() == last_node) else {
                break; // dead end: no extension found, discard this attempt
            };
            chain.push(pool.remove(pos));
        }

        let closed = store.segment(*chain.last().unwrap()).last() == store.segment(chain[0]).first();
        if !closed {
            continue;
        }

        let mut coords = Vec::new();
        for (i, &sid) in chain.iter().enumerate() {
            let seg_coords = &store.segment(sid).coords;
            if i == 0 {
                coords.extend(seg_coords.iter().copied());
            } else {
                coords.extend(seg_coords.iter().copied().skip(1));
            }
        }
        let area = signed_area(&coords);
        if area <= 0.0 {
            continue; // not an outer-oriented chain
        }
        let tag = place_tag(area, island_area_m2);
        let key = member_set(&chain);

        if let Some(&existing) = existing_by_members.get(&key) {
            store.feature_mut(existing).tags.set("place", tag);
        } else {
            let new_id = store.push_feature(ObjectClass::Øy, Geometry::Polygon { outer: coords, inners: vec![] });
            let f = store.feature_mut(new_id);
            f.members = vec![chain.clone()];
            f.tags.set("place", tag);
            f.tags.remove("natural"); // strip any inherited coastline tag; it belongs on segments only
            existing_by_members.insert(key, new_id);
        }
    }
}

fn build_island_relation_index(store: &Store) -> HashMap<BTreeSet<SegmentId>, FeatureId> {
    let mut index = HashMap::new();
    for id in store.live_feature_ids() {
        let f: &Feature = store.feature(id);
        if f.class == ObjectClass::Øy && f.members.len() == 1 {
            index.insert(member_set(&f.members[0]), id);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Node;

    fn square(a: f64) -> Vec<Node> {
        vec![
            Node::new(0.0, 0.0),
            Node::new(0.0, a),
            Node::new(a, a),
            Node::new(a, 0.0),
            Node::new(0.0, 0.0),
        ]
    }

    #[test]
    fn inner_ring_with_single_segment_tags_that_segment() {
        let mut store = Store::new();
        let inner = square(1.0); // large enough in degrees to exceed the island threshold
        let sid = store.push_segment(ObjectClass::Innsjøkant, inner.clone());
        let outer = square(10.0);
        let fid = store.push_feature(ObjectClass::Innsjø, Geometry::Polygon { outer: outer.clone(), inners: vec![inner] });
        store.feature_mut(fid).members = vec![vec![], vec![sid]];
        detect_islands(&mut store, ISLAND_AREA_M2);
        assert_eq!(store.segment(sid).tags.get("place"), Some("island"));
    }

    #[test]
    fn inner_ring_with_multiple_segments_synthesises_oy_feature() {
        let mut store = Store::new();
        let inner = square(1.0);
        let s1 = store.push_segment(ObjectClass::Innsjøkant, vec![inner[0], inner[1]]);
        let s2 = store.push_segment(ObjectClass::Innsjøkant, vec![inner[1], inner[2], inner[3], inner[0]]);
        let outer = square(10.0);
        let fid = store.push_feature(ObjectClass::Innsjø, Geometry::Polygon { outer: outer.clone(), inners: vec![inner] });
        store.feature_mut(fid).members = vec![vec![], vec![s1, s2]];
        let before = store.features.len();
        detect_islands(&mut store, ISLAND_AREA_M2);
        assert_eq!(store.features.len(), before + 1);
        assert!(store.live_features().any(|f| f.class == ObjectClass::Øy && f.tags.get("place") == Some("island")));
    }

    #[test]
    fn sea_faces_are_deleted() {
        let mut store = Store::new();
        let sea = square(1.0);
        let fid = store.push_feature(ObjectClass::Havflate, Geometry::Polygon { outer: sea, inners: vec![] });
        store.feature_mut(fid).members = vec![vec![]];
        detect_islands(&mut store, ISLAND_AREA_M2);
        assert!(store.is_deleted(fid));
    }

    #[test]
    fn islet_below_threshold() {
        let mut store = Store::new();
        // a tiny ring, far below the 100_000 m^2 threshold.
        let inner = square(0.0001);
        let sid = store.push_segment(ObjectClass::Innsjøkant, inner.clone());
        let outer = square(10.0);
        let fid = store.push_feature(ObjectClass::Innsjø, Geometry::Polygon { outer, inners: vec![inner] });
        store.feature_mut(fid).members = vec![vec![], vec![sid]];
        detect_islands(&mut store, ISLAND_AREA_M2);
        assert_eq!(store.segment(sid).tags.get("place"), Some("islet"));
    }
}

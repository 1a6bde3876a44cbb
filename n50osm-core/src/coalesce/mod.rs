use std::collections::HashSet;

use crate::geo::primitives::BBox;
use crate::model::class::ObjectClass;
use crate::model::feature::{FeatureId, Geometry};
use crate::model::node::Node;
use crate::model::segment::SegmentId;
use crate::store::Store;

/// nudge distance applied to an ambiguous crossing node (§4.5).
const EPSILON_DEG: f64 = 1e-6;

/// the Node Coalescer (§4.5). returns the final shared-node set, which Emit
/// uses to decide which nodes get their own `<node>` element vs. being
/// inlined into a single way.
pub fn coalesce(store: &mut Store, detect_intersections: bool) -> HashSet<Node> {
    let mut shared = seed_shared_set(store);
    if detect_intersections {
        resolve_stream_intersections(store, &mut shared);
    }
    simplify_auxiliary_cuts(store);
    shared
}

fn seed_shared_set(store: &Store) -> HashSet<Node> {
    let mut shared = HashSet::new();
    for segment in &store.segments {
        shared.insert(segment.first());
        shared.insert(segment.last());
    }
    for feature in store.live_features() {
        if let Geometry::LineString(coords) = &feature.geometry {
            if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
                shared.insert(first);
                shared.insert(last);
            }
        }
    }
    shared
}

fn stream_feature_ids(store: &Store) -> Vec<FeatureId> {
    store
        .live_feature_ids()
        .filter(|&id| matches!(store.feature(id).geometry, Geometry::LineString(_)))
        .collect()
}

fn resolve_stream_intersections(store: &mut Store, shared: &mut HashSet<Node>) {
    for stream_id in stream_feature_ids(store) {
        let stream_bbox = match &store.feature(stream_id).geometry {
            Geometry::LineString(coords) => BBox::of(coords),
            _ => continue,
        };

        let candidate_segments: Vec<SegmentId> = store
            .segments
            .iter()
            .filter(|s| s.bbox().intersects(&stream_bbox))
            .map(|s| s.id)
            .collect();

        for seg_id in candidate_segments {
            resolve_one_pair(store, stream_id, seg_id, shared);
        }
    }
}

fn resolve_one_pair(store: &mut Store, stream_id: FeatureId, seg_id: SegmentId, shared: &mut HashSet<Node>) {
    let common: Vec<Node> = {
        let stream_coords = match &store.feature(stream_id).geometry {
            Geometry::LineString(c) => c.clone(),
            _ => return,
        };
        let seg_coords = store.segment(seg_id).coords.clone();
        let seg_set: HashSet<Node> = seg_coords.iter().copied().collect();
        stream_coords.into_iter().filter(|n| seg_set.contains(n)).collect::<HashSet<_>>().into_iter().collect()
    };

    let is_water_edge = store.segment(seg_id).class.is_water_edge();

    for n in common {
        let stream_interior = is_interior(store, stream_id, n);
        let stream_neighbor_in_intersection = neighbor_also_crossing(store, stream_id, n, &store.segment(seg_id).coords.clone());

        if stream_interior && !shared.contains(&n) && !stream_neighbor_in_intersection {
            remove_node_from_stream(store, stream_id, n);
        } else {
            nudge_node_in_stream(store, stream_id, n);
            if !stream_interior && is_water_edge {
                shared.insert(n);
            }
        }

        // §4.5: "attempt the same removal on the segment" — re-evaluated
        // against the segment's own neighbour structure, independent of
        // whether the stream side removed, nudged, or kept its copy.
        let seg_interior = is_interior_segment(store, seg_id, n);
        let stream_coords_now = match &store.feature(stream_id).geometry {
            Geometry::LineString(c) => c.clone(),
            _ => Vec::new(),
        };
        let seg_neighbor_in_intersection = neighbor_also_crossing_list(&store.segment(seg_id).coords, n, &stream_coords_now);
        if seg_interior && !shared.contains(&n) && !seg_neighbor_in_intersection {
            remove_node_from_segment(store, seg_id, n);
        }
    }
}

fn is_interior(store: &Store, stream_id: FeatureId, n: Node) -> bool {
    if let Geometry::LineString(coords) = &store.feature(stream_id).geometry {
        coords.len() > 2 && coords[1..coords.len() - 1].contains(&n)
    } else {
        false
    }
}

fn is_interior_segment(store: &Store, seg_id: SegmentId, n: Node) -> bool {
    let coords = &store.segment(seg_id).coords;
    coords.len() > 2 && coords[1..coords.len() - 1].contains(&n)
}

/// true iff either neighbour of `n` on the line also lies in `other_coords`
/// (§4.5: "neither of n's stream neighbours is in the intersection").
fn neighbor_also_crossing(store: &Store, stream_id: FeatureId, n: Node, other_coords: &[Node]) -> bool {
    if let Geometry::LineString(coords) = &store.feature(stream_id).geometry {
        neighbor_also_crossing_list(coords, n, other_coords)
    } else {
        false
    }
}

fn neighbor_also_crossing_list(coords: &[Node], n: Node, other_coords: &[Node]) -> bool {
    let Some(idx) = coords.iter().position(|&c| c == n) else { return false };
    let other_set: HashSet<Node> = other_coords.iter().copied().collect();
    let prev = idx.checked_sub(1).and_then(|i| coords.get(i));
    let next = coords.get(idx + 1);
    prev.is_some_and(|p| other_set.contains(p)) || next.is_some_and(|q| other_set.contains(q))
}

fn remove_node_from_stream(store: &mut Store, stream_id: FeatureId, n: Node) {
    if let Geometry::LineString(coords) = &mut store.feature_mut(stream_id).geometry {
        coords.retain(|&c| c != n);
    }
}

fn nudge_node_in_stream(store: &mut Store, stream_id: FeatureId, n: Node) {
    let nudged = Node::new(n.lon() + 4.0 * EPSILON_DEG, n.lat() + 2.0 * EPSILON_DEG);
    if let Geometry::LineString(coords) = &mut store.feature_mut(stream_id).geometry {
        for c in coords.iter_mut() {
            if *c == n {
                *c = nudged;
            }
        }
    }
}

fn remove_node_from_segment(store: &mut Store, seg_id: SegmentId, n: Node) {
    let segment = store.segment_mut(seg_id);
    segment.coords.retain(|&c| c != n);
}

/// auxiliary cut lines collapse to just their two endpoints (§4.5),
/// regardless of whatever interior shape they were ingested with.
fn simplify_auxiliary_cuts(store: &mut Store) {
    for segment in &mut store.segments {
        if segment.class == ObjectClass::FiktivDelelinje && segment.coords.len() > 2 {
            let first = segment.first();
            let last = segment.last();
            segment.coords = vec![first, last];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_shared_set_from_segment_and_linestring_endpoints() {
        let mut store = Store::new();
        store.push_segment(ObjectClass::Innsjøkant, vec![Node::new(0.0, 0.0), Node::new(1.0, 1.0)]);
        store.push_feature(ObjectClass::ElvBekk, Geometry::LineString(vec![Node::new(2.0, 2.0), Node::new(3.0, 3.0)]));
        let shared = coalesce(&mut store, false);
        assert!(shared.contains(&Node::new(0.0, 0.0)));
        assert!(shared.contains(&Node::new(3.0, 3.0)));
    }

    #[test]
    fn interior_stream_crossing_with_unrelated_neighbours_is_deleted_and_segment_untouched() {
        let mut store = Store::new();
        let n = Node::new(5.0, 0.0);
        // segment has n as an endpoint (not interior), so the segment-side
        // removal attempt does not fire.
        let seg = store.push_segment(ObjectClass::Innsjøkant, vec![n, Node::new(5.0, 5.0)]);
        let stream = store.push_feature(
            ObjectClass::ElvBekk,
            Geometry::LineString(vec![Node::new(0.0, 0.0), n, Node::new(10.0, 0.0)]),
        );
        let mut shared = seed_shared_set(&store);
        shared.remove(&n);
        resolve_stream_intersections(&mut store, &mut shared);
        match &store.feature(stream).geometry {
            Geometry::LineString(coords) => assert!(!coords.contains(&n)),
            _ => panic!(),
        }
        assert_eq!(store.segment(seg).coords.len(), 2);
    }

    #[test]
    fn fiktiv_delelinje_collapses_to_endpoints() {
        let mut store = Store::new();
        let a = Node::new(0.0, 0.0);
        let m = Node::new(1.0, 1.0);
        let b = Node::new(2.0, 2.0);
        let sid = store.push_segment(ObjectClass::FiktivDelelinje, vec![a, m, b]);
        coalesce(&mut store, false);
        assert_eq!(store.segment(sid).coords, vec![a, b]);
    }
}

use std::collections::HashSet;

use crate::geo::primitives::BBox;
use crate::index::{coords_subset_of_ring, SegmentIndex};
use crate::model::class::ObjectClass;
use crate::model::feature::FeatureId;
use crate::model::node::Node;
use crate::model::segment::SegmentId;
use crate::store::Store;

/// runs the polygon decomposer (§4.3) over every polygon feature currently
/// live in the store. must run after Classifier (orientation depends on
/// segment class, which the static table/overrides have already assigned)
/// and after the segment index has been built over the full segment pool,
/// since border fabrication inserts new segments mid-run that later rings
/// never need to see (fabricated segments are per-ring, never shared).
pub fn decompose_all(store: &mut Store, index: &SegmentIndex) {
    let polygon_ids: Vec<FeatureId> = store
        .live_feature_ids()
        .filter(|id| store.feature(*id).is_polygon())
        .collect();

    for fid in polygon_ids {
        let is_sea = store.feature(fid).class.is_sea();
        let class = store.feature(fid).class.clone();
        let ring_count = store.feature(fid).geometry.rings().len();
        let mut all_members = Vec::with_capacity(ring_count);
        for ring_idx in 0..ring_count {
            let ring = store.feature(fid).geometry.rings()[ring_idx].clone();
            let members = decompose_ring(store, index, &ring, is_sea, &class, fid, ring_idx);
            all_members.push(members);
        }
        store.feature_mut(fid).members = all_members;
    }
}

fn decompose_ring(
    store: &mut Store,
    index: &SegmentIndex,
    ring: &[Node],
    is_sea: bool,
    class: &ObjectClass,
    fid: FeatureId,
    ring_idx: usize,
) -> Vec<SegmentId> {
    let n_edges = ring.len().saturating_sub(1);
    if n_edges == 0 {
        return Vec::new();
    }
    let bbox = BBox::of(ring);
    let ring_set: HashSet<Node> = ring.iter().copied().collect();

    let mut accepted = Vec::new();
    let mut matched_nodes = 0usize;

    for sid in index.candidates_in_bbox(&bbox) {
        let seg_coords = store.segment(sid).coords.clone();
        if !coords_subset_of_ring(store.segment(sid), &ring_set) {
            continue;
        }
        if seg_coords.len() == 2 && !are_ring_neighbors(ring, n_edges, seg_coords[0], seg_coords[1]) {
            continue;
        }

        matched_nodes += seg_coords.len() - 1;
        orient_and_count(store, sid, ring, n_edges, is_sea, class);
        accepted.push(sid);
    }

    if matched_nodes < n_edges && !is_sea {
        fabricate_border(store, ring, n_edges, &mut accepted, fid, ring_idx);
    }

    sort_by_second_node_index(store, ring, n_edges, &mut accepted);
    accepted
}

/// §4.3 step 5: bumps `used` on every accepted segment, and — at most once
/// per segment — orients it so water lies on its left.
fn orient_and_count(store: &mut Store, sid: SegmentId, ring: &[Node], n_edges: usize, is_sea: bool, class: &ObjectClass) {
    let seg_class = store.segment(sid).class.clone();
    let wants_orientation = (is_sea && (seg_class.is_coastline() || seg_class.is_sea_separator()))
        || (class.is_water_body() && seg_class.is_water_edge());

    let segment = store.segment_mut(sid);
    segment.used += 1;
    if !wants_orientation || segment.oriented {
        return;
    }

    let first = segment.first();
    let second = segment.coords[1];
    if !pair_is_in_ring_order(ring, n_edges, first, second) {
        segment.reverse();
    }
    segment.oriented = true;
}

/// true iff `a` immediately precedes `b` in `ring` (cyclic, `ring[n_edges]`
/// duplicates `ring[0]`).
fn pair_is_in_ring_order(ring: &[Node], n_edges: usize, a: Node, b: Node) -> bool {
    match index_in_ring(ring, n_edges, a) {
        Some(i) => ring[(i + 1) % n_edges] == b,
        None => false,
    }
}

fn are_ring_neighbors(ring: &[Node], n_edges: usize, a: Node, b: Node) -> bool {
    pair_is_in_ring_order(ring, n_edges, a, b) || pair_is_in_ring_order(ring, n_edges, b, a)
}

fn index_in_ring(ring: &[Node], n_edges: usize, node: Node) -> Option<usize> {
    ring[..n_edges].iter().position(|&n| n == node)
}

fn sort_by_second_node_index(store: &Store, ring: &[Node], n_edges: usize, accepted: &mut [SegmentId]) {
    accepted.sort_by_key(|sid| {
        let coords = &store.segment(*sid).coords;
        let second = coords.get(1).copied().unwrap_or(coords[0]);
        index_in_ring(ring, n_edges, second).unwrap_or(usize::MAX)
    });
}

/// §4.3 "border fabrication": covers the ring with the accepted segments'
/// edges, then materialises a `KantUtsnitt` segment for each maximal
/// uncovered run.
fn fabricate_border(store: &mut Store, ring: &[Node], n_edges: usize, accepted: &mut Vec<SegmentId>, fid: FeatureId, ring_idx: usize) {
    let mut covered = vec![false; n_edges];
    for &sid in accepted.iter() {
        let coords = store.segment(sid).coords.clone();
        for pair in coords.windows(2) {
            match edge_index_for_pair(ring, n_edges, pair[0], pair[1]) {
                Some(i) => covered[i] = true,
                None => log::warn!(
                    "feature {:?} ring {ring_idx}: segment edge ({}, {}) does not align with a ring edge",
                    store.feature(fid).gml_id,
                    pair[0],
                    pair[1]
                ),
            }
        }
    }

    for (s, e) in uncovered_runs(&covered) {
        let coords = ring_node_range(ring, n_edges, s, e);
        let sid = store.push_segment(ObjectClass::KantUtsnitt, coords);
        store.segment_mut(sid).used = 1;
        accepted.push(sid);
    }
}

fn edge_index_for_pair(ring: &[Node], n_edges: usize, a: Node, b: Node) -> Option<usize> {
    if let Some(i) = index_in_ring(ring, n_edges, a) {
        if ring[(i + 1) % n_edges] == b {
            return Some(i);
        }
    }
    if let Some(i) = index_in_ring(ring, n_edges, b) {
        if ring[(i + 1) % n_edges] == a {
            return Some(i);
        }
    }
    None
}

/// maximal runs of `false` in a cyclic boolean array, each given as an
/// inclusive `(start, end)` edge-index pair. rotates to start right after a
/// covered→uncovered transition so a run never has to be reported wrapped.
fn uncovered_runs(covered: &[bool]) -> Vec<(usize, usize)> {
    let n = covered.len();
    if covered.iter().all(|&c| !c) {
        return vec![(0, n - 1)];
    }
    if covered.iter().all(|&c| c) {
        return vec![];
    }
    let start = (0..n).find(|&i| covered[i] && !covered[(i + 1) % n]).map(|i| (i + 1) % n);
    let Some(start) = start else { return vec![] };

    let mut runs = Vec::new();
    let mut i = start;
    loop {
        if !covered[i] {
            let run_start = i;
            let mut run_end = i;
            loop {
                run_end = i;
                i = (i + 1) % n;
                if covered[i] || i == start {
                    break;
                }
            }
            runs.push((run_start, run_end));
            if i == start {
                break;
            }
        } else {
            i = (i + 1) % n;
            if i == start {
                break;
            }
        }
    }
    runs
}

/// `R[s..e+1]` (inclusive of the node just past `e`), cyclic.
fn ring_node_range(ring: &[Node], n_edges: usize, s: usize, e: usize) -> Vec<Node> {
    let mut out = Vec::new();
    let mut i = s;
    loop {
        out.push(ring[i]);
        if i == e {
            out.push(ring[(i + 1) % n_edges]);
            break;
        }
        i = (i + 1) % n_edges;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::feature::Geometry;

    fn square_ring() -> Vec<Node> {
        vec![
            Node::new(0.0, 0.0),
            Node::new(0.0, 10.0),
            Node::new(10.0, 10.0),
            Node::new(10.0, 0.0),
            Node::new(0.0, 0.0),
        ]
    }

    #[test]
    fn single_segment_covering_whole_ring_needs_no_fabrication() {
        let mut store = Store::new();
        let ring = square_ring();
        store.push_segment(ObjectClass::Innsjøkant, ring.clone());
        let index = SegmentIndex::build(&store);
        let fid = store.push_feature(ObjectClass::Innsjø, Geometry::Polygon { outer: ring.clone(), inners: vec![] });
        decompose_all(&mut store, &index);
        let members = &store.feature(fid).members[0];
        assert_eq!(members.len(), 1);
        assert_eq!(store.segment(members[0]).coords, ring);
    }

    #[test]
    fn partial_coverage_fabricates_missing_border() {
        let mut store = Store::new();
        let ring = square_ring();
        // only the first edge is present as a real segment.
        store.push_segment(ObjectClass::Innsjøkant, vec![ring[0], ring[1]]);
        let index = SegmentIndex::build(&store);
        let fid = store.push_feature(ObjectClass::Innsjø, Geometry::Polygon { outer: ring.clone(), inners: vec![] });
        decompose_all(&mut store, &index);
        let members = &store.feature(fid).members[0];
        assert_eq!(members.len(), 2);
        let fabricated = store.segment(members[1]);
        assert_eq!(fabricated.class, ObjectClass::KantUtsnitt);
        assert_eq!(fabricated.coords, vec![ring[1], ring[2], ring[3], ring[4]]);
    }

    #[test]
    fn concatenating_members_reproduces_closed_ring() {
        let mut store = Store::new();
        let ring = square_ring();
        store.push_segment(ObjectClass::Innsjøkant, vec![ring[0], ring[1]]);
        store.push_segment(ObjectClass::Innsjøkant, vec![ring[1], ring[2]]);
        let index = SegmentIndex::build(&store);
        let fid = store.push_feature(ObjectClass::Innsjø, Geometry::Polygon { outer: ring.clone(), inners: vec![] });
        decompose_all(&mut store, &index);
        let members = &store.feature(fid).members[0];
        let mut reconstructed = Vec::new();
        for (i, sid) in members.iter().enumerate() {
            let coords = &store.segment(*sid).coords;
            if i == 0 {
                reconstructed.extend(coords.iter().copied());
            } else {
                reconstructed.extend(coords.iter().copied().skip(1));
            }
        }
        assert_eq!(reconstructed.first(), reconstructed.last());
        assert_eq!(reconstructed, ring);
    }

    #[test]
    fn orientation_flips_water_edge_when_against_ring_order() {
        let mut store = Store::new();
        let ring = square_ring();
        // stored in the opposite direction from the ring.
        store.push_segment(ObjectClass::Innsjøkant, vec![ring[1], ring[0]]);
        let index = SegmentIndex::build(&store);
        let fid = store.push_feature(ObjectClass::Innsjø, Geometry::Polygon { outer: ring.clone(), inners: vec![] });
        decompose_all(&mut store, &index);
        let members = &store.feature(fid).members[0];
        assert_eq!(store.segment(members[0]).coords[0], ring[0]);
        assert!(store.segment(members[0]).reversed);
    }
}

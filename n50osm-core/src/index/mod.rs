use std::collections::HashSet;

use rstar::{RTree, RTreeObject, AABB};

use crate::geo::primitives::BBox;
use crate::model::node::Node;
use crate::model::segment::{Segment, SegmentId};
use crate::store::Store;

struct IndexedSegment {
    id: SegmentId,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn aabb_of(bbox: &BBox) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.min_lon, bbox.min_lat], [bbox.max_lon, bbox.max_lat])
}

/// a bounding-box index over every segment in the pool (§4.3). built once
/// per run, after Classifier and before the Polygon Decomposer; nothing
/// mutates segment coordinates after this point, so the tree never needs
/// to be rebuilt mid-pipeline (only individual segments' `used`/`oriented`
/// fields are mutated, which don't affect the spatial index).
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    pub fn build(store: &Store) -> Self {
        let items: Vec<IndexedSegment> = store
            .segments
            .iter()
            .map(|s| IndexedSegment { id: s.id, envelope: aabb_of(&s.bbox()) })
            .collect();
        SegmentIndex { tree: RTree::bulk_load(items) }
    }

    /// every segment whose bounding box intersects `bbox` (§4.3 step 2).
    pub fn candidates_in_bbox(&self, bbox: &BBox) -> Vec<SegmentId> {
        self.tree
            .locate_in_envelope_intersecting(&aabb_of(bbox))
            .map(|item| item.id)
            .collect()
    }
}

/// true iff every node of `segment` appears in `ring_set` (§4.3 step 2:
/// "whose coordinate multiset is a subset of the ring's"). the ring is
/// small enough per-municipality that a `HashSet` lookup beats maintaining
/// a second spatial structure.
pub fn coords_subset_of_ring(segment: &Segment, ring_set: &HashSet<Node>) -> bool {
    segment.coords.iter().all(|c| ring_set.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::class::ObjectClass;

    #[test]
    fn finds_segment_whose_bbox_intersects_query() {
        let mut store = Store::new();
        store.push_segment(ObjectClass::Innsjøkant, vec![Node::new(0.0, 0.0), Node::new(1.0, 1.0)]);
        store.push_segment(ObjectClass::Innsjøkant, vec![Node::new(50.0, 50.0), Node::new(51.0, 51.0)]);
        let index = SegmentIndex::build(&store);
        let hits = index.candidates_in_bbox(&BBox { min_lon: -1.0, min_lat: -1.0, max_lon: 2.0, max_lat: 2.0 });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], SegmentId(0));
    }

    #[test]
    fn coord_subset_check() {
        let mut store = Store::new();
        let id = store.push_segment(ObjectClass::Innsjøkant, vec![Node::new(0.0, 0.0), Node::new(1.0, 1.0)]);
        let ring_set: HashSet<Node> = [Node::new(0.0, 0.0), Node::new(1.0, 1.0), Node::new(2.0, 2.0)].into_iter().collect();
        assert!(coords_subset_of_ring(store.segment(id), &ring_set));
        let other_set: HashSet<Node> = [Node::new(9.0, 9.0)].into_iter().collect();
        assert!(!coords_subset_of_ring(store.segment(id), &other_set));
    }
}

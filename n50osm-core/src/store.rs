use crate::model::feature::{Feature, FeatureId, Geometry};
use crate::model::segment::{Segment, SegmentId};

/// the feature and segment arenas (§9 design note): every cross-reference
/// in the pipeline after Ingest is an index into one of these two `Vec`s,
/// never a pointer, so the segment/ring/feature cycle never needs unsafe
/// aliasing or `Rc<RefCell<_>>`.
#[derive(Debug, Default)]
pub struct Store {
    pub features: Vec<Feature>,
    pub segments: Vec<Segment>,
    /// tombstones parallel to `features`; a deleted feature's slot stays put
    /// so every previously-issued `FeatureId` stays valid as an index. sea
    /// faces are tombstoned, never removed, at the end of island detection.
    deleted: Vec<bool>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    pub fn push_feature(&mut self, class: crate::model::class::ObjectClass, geometry: Geometry) -> FeatureId {
        let id = FeatureId(self.features.len());
        self.features.push(Feature::new(id, class, geometry));
        self.deleted.push(false);
        id
    }

    pub fn push_segment(&mut self, class: crate::model::class::ObjectClass, coords: Vec<crate::model::node::Node>) -> SegmentId {
        let id = SegmentId(self.segments.len());
        self.segments.push(Segment::new(id, class, coords));
        id
    }

    pub fn feature(&self, id: FeatureId) -> &Feature {
        &self.features[id.0]
    }

    pub fn feature_mut(&mut self, id: FeatureId) -> &mut Feature {
        &mut self.features[id.0]
    }

    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.segments[id.0]
    }

    pub fn is_deleted(&self, id: FeatureId) -> bool {
        self.deleted[id.0]
    }

    pub fn delete_feature(&mut self, id: FeatureId) {
        self.deleted[id.0] = true;
    }

    /// tombstone every feature matching a predicate (used to delete sea
    /// faces at the end of island detection, §4.4) rather than physically
    /// removing them, so `FeatureId`s issued earlier stay valid indices.
    pub fn delete_features_where<F: Fn(&Feature) -> bool>(&mut self, pred: F) {
        for (i, f) in self.features.iter().enumerate() {
            if pred(f) {
                self.deleted[i] = true;
            }
        }
    }

    /// live (non-tombstoned) features, in arena order.
    pub fn live_features(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.deleted[*i])
            .map(|(_, f)| f)
    }

    pub fn live_feature_ids(&self) -> impl Iterator<Item = FeatureId> + '_ {
        (0..self.features.len()).filter(|i| !self.deleted[*i]).map(FeatureId)
    }
}

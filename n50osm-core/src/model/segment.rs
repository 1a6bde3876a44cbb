use super::class::ObjectClass;
use super::node::Node;
use super::tags::Tags;
use crate::geo::primitives::BBox;

/// stable index into the segment arena. never dereference-equivalent to a
/// pointer; segments are only ever reached through `FeatureStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub usize);

#[derive(Debug, Clone)]
pub struct Segment {
    pub id: SegmentId,
    pub class: ObjectClass,
    pub coords: Vec<Node>,
    /// 0 = unreferenced; >=1 = referenced by at least one polygon ring.
    pub used: u32,
    pub tags: Tags,
    pub gml_id: Option<String>,
    /// set exactly once by the decomposer; `true` once this segment's
    /// stored coordinate order has been flipped from its ingested order.
    pub reversed: bool,
    /// becomes `Some` only during orientation (§4.3 step 5); tracks whether
    /// orientation has already been decided so later conflicting requests
    /// are ignored.
    pub oriented: bool,
    /// assigned only during Emit.
    pub osm_id: Option<i64>,
}

impl Segment {
    pub fn new(id: SegmentId, class: ObjectClass, coords: Vec<Node>) -> Self {
        let used = if class.is_inherently_used() { 1 } else { 0 };
        Segment {
            id,
            class,
            coords,
            used,
            tags: Tags::new(),
            gml_id: None,
            reversed: false,
            oriented: false,
            osm_id: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.coords.len() >= 2 && self.coords.first() == self.coords.last()
    }

    pub fn bbox(&self) -> BBox {
        BBox::of(&self.coords)
    }

    pub fn first(&self) -> Node {
        self.coords[0]
    }

    pub fn last(&self) -> Node {
        *self.coords.last().expect("segment has at least 2 nodes")
    }

    pub fn reverse(&mut self) {
        self.coords.reverse();
        self.reversed = !self.reversed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherently_used_classes_start_at_one() {
        let s = Segment::new(
            SegmentId(0),
            ObjectClass::Kystkontur,
            vec![Node::new(0.0, 0.0), Node::new(1.0, 1.0)],
        );
        assert_eq!(s.used, 1);
    }

    #[test]
    fn ordinary_classes_start_at_zero() {
        let s = Segment::new(
            SegmentId(0),
            ObjectClass::Innsjøkant,
            vec![Node::new(0.0, 0.0), Node::new(1.0, 1.0)],
        );
        assert_eq!(s.used, 0);
    }
}

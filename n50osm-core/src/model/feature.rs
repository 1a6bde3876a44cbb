use std::collections::BTreeMap;

use super::class::ObjectClass;
use super::node::Node;
use super::segment::SegmentId;
use super::tags::Tags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub usize);

#[derive(Debug, Clone)]
pub enum Geometry {
    Point(Node),
    LineString(Vec<Node>),
    /// an outer ring followed by zero or more inner rings; each ring is a
    /// closed node sequence (`first == last`).
    Polygon {
        outer: Vec<Node>,
        inners: Vec<Vec<Node>>,
    },
}

impl Geometry {
    pub fn rings(&self) -> Vec<&Vec<Node>> {
        match self {
            Geometry::Polygon { outer, inners } => {
                let mut v = vec![outer];
                v.extend(inners.iter());
                v
            }
            _ => vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Feature {
    pub id: FeatureId,
    pub class: ObjectClass,
    pub geometry: Geometry,
    pub tags: Tags,
    /// debug/origin metadata; echoed as uppercase tags in debug mode (§4.9).
    pub extras: BTreeMap<String, String>,
    /// one list of segment references per ring, in ring order. empty until
    /// the polygon decomposer has run; irrelevant for Point/LineString.
    pub members: Vec<Vec<SegmentId>>,
    pub gml_id: Option<String>,
    pub osm_id: Option<i64>,
}

impl Feature {
    pub fn new(id: FeatureId, class: ObjectClass, geometry: Geometry) -> Self {
        Feature {
            id,
            class,
            geometry,
            tags: Tags::new(),
            extras: BTreeMap::new(),
            members: Vec::new(),
            gml_id: None,
            osm_id: None,
        }
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self.geometry, Geometry::Polygon { .. })
    }

    pub fn outer_ring(&self) -> Option<&Vec<Node>> {
        match &self.geometry {
            Geometry::Polygon { outer, .. } => Some(outer),
            _ => None,
        }
    }

    pub fn inner_rings(&self) -> &[Vec<Node>] {
        match &self.geometry {
            Geometry::Polygon { inners, .. } => inners,
            _ => &[],
        }
    }
}

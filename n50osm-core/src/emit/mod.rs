//! Emit (§4.9): flattens the store's live features and referenced segments
//! into an [`OsmDocument`] of nodes, ways, and relations with assigned
//! provisional identifiers. the last stage of the pipeline; nothing past
//! this point mutates the `Store`, except to record the identifiers it
//! hands out back onto `Feature::osm_id`/`Segment::osm_id` for debugging.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::model::feature::{FeatureId, Geometry};
use crate::model::node::Node;
use crate::model::segment::SegmentId;
use crate::model::tags::Tags;
use crate::store::Store;

/// the first provisional identifier Emit hands out; every later one
/// descends from here (§4.9, §6: "negative integers descending from about
/// -1000").
const FIRST_PROVISIONAL_ID: i64 = -1000;

#[derive(Debug, Clone)]
pub struct OsmNode {
    pub id: i64,
    pub node: Node,
    pub tags: Tags,
}

#[derive(Debug, Clone)]
pub struct OsmWay {
    pub id: i64,
    pub node_ids: Vec<i64>,
    pub tags: Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationRole {
    Outer,
    Inner,
}

impl RelationRole {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationRole::Outer => "outer",
            RelationRole::Inner => "inner",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelationMember {
    pub way_id: i64,
    pub role: RelationRole,
}

#[derive(Debug, Clone)]
pub struct OsmRelation {
    pub id: i64,
    pub tags: Tags,
    pub members: Vec<RelationMember>,
}

#[derive(Debug, Clone, Default)]
pub struct OsmDocument {
    pub nodes: Vec<OsmNode>,
    pub ways: Vec<OsmWay>,
    pub relations: Vec<OsmRelation>,
}

struct IdAllocator(i64);

impl IdAllocator {
    fn new() -> Self {
        IdAllocator(FIRST_PROVISIONAL_ID)
    }

    fn next(&mut self) -> i64 {
        let id = self.0;
        self.0 -= 1;
        id
    }
}

/// state threaded through node assignment: which coordinates are shared
/// (reused across ways) and where each already-emitted node id lives in
/// `doc.nodes`, so a shared node's tags can be amended in place.
struct NodeBook {
    shared_ids: HashMap<Node, i64>,
    index_by_id: HashMap<i64, usize>,
}

impl NodeBook {
    fn get_or_create(&mut self, coord: Node, ids: &mut IdAllocator, doc: &mut OsmDocument) -> i64 {
        if let Some(&id) = self.shared_ids.get(&coord) {
            return id;
        }
        let id = ids.next();
        self.index_by_id.insert(id, doc.nodes.len());
        doc.nodes.push(OsmNode { id, node: coord, tags: Tags::new() });
        id
    }

    fn extend_tags(&self, doc: &mut OsmDocument, node_id: i64, tags: &Tags) {
        if let Some(&idx) = self.index_by_id.get(&node_id) {
            doc.nodes[idx].tags.extend(tags);
        }
    }
}

fn debug_extras_as_tags(extras: &std::collections::BTreeMap<String, String>) -> Tags {
    let mut out = Tags::new();
    for (k, v) in extras {
        out.set(k.to_uppercase(), v.clone());
    }
    out
}

/// true iff reusing `sid`'s way directly as the feature's own element would
/// silently merge two different `natural` values (§4.9: single-ring,
/// single-segment polygons reuse the segment's way unless this collides).
fn natural_collision(store: &Store, sid: SegmentId, feature_tags: &Tags) -> bool {
    match (store.segment(sid).tags.get("natural"), feature_tags.get("natural")) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}

/// builds the emitted [`OsmDocument`] from a fully-processed store. `shared`
/// is the Node Coalescer's final shared-node set (§4.5); `debug` controls
/// whether unreferenced segments and each feature/segment's `extras` are
/// carried into the output.
pub fn emit(store: &mut Store, shared: &HashSet<Node>, debug: bool) -> OsmDocument {
    let mut ids = IdAllocator::new();
    let mut doc = OsmDocument::default();

    let mut book = NodeBook { shared_ids: HashMap::new(), index_by_id: HashMap::new() };
    let mut sorted_shared: Vec<Node> = shared.iter().copied().collect();
    sorted_shared.sort();
    for n in sorted_shared {
        let id = ids.next();
        book.shared_ids.insert(n, id);
        book.index_by_id.insert(id, doc.nodes.len());
        doc.nodes.push(OsmNode { id, node: n, tags: Tags::new() });
    }

    let segment_ids_to_emit: Vec<SegmentId> = store.segments.iter().filter(|s| s.used > 0 || debug).map(|s| s.id).collect();

    let mut way_index: HashMap<i64, usize> = HashMap::new();
    let mut segment_way_ids: HashMap<SegmentId, i64> = HashMap::new();
    for sid in segment_ids_to_emit {
        let coords = store.segment(sid).coords.clone();
        let node_ids: Vec<i64> = coords.iter().map(|&c| book.get_or_create(c, &mut ids, &mut doc)).collect();
        let way_id = ids.next();
        let mut tags = store.segment(sid).tags.clone();
        if debug && store.segment(sid).used == 0 {
            tags.set("debug:unused", "yes");
        }
        way_index.insert(way_id, doc.ways.len());
        doc.ways.push(OsmWay { id: way_id, node_ids, tags });
        segment_way_ids.insert(sid, way_id);
        store.segment_mut(sid).osm_id = Some(way_id);
    }

    let feature_ids: Vec<FeatureId> = store.live_feature_ids().collect();
    for fid in feature_ids {
        let geometry = store.feature(fid).geometry.clone();
        let mut tags = store.feature(fid).tags.clone();
        if debug {
            tags.extend(&debug_extras_as_tags(&store.feature(fid).extras));
        }

        let osm_id = match geometry {
            Geometry::Point(n) => {
                let node_id = book.get_or_create(n, &mut ids, &mut doc);
                book.extend_tags(&mut doc, node_id, &tags);
                node_id
            }
            Geometry::LineString(coords) => {
                let node_ids: Vec<i64> = coords.iter().map(|&c| book.get_or_create(c, &mut ids, &mut doc)).collect();
                let way_id = ids.next();
                way_index.insert(way_id, doc.ways.len());
                doc.ways.push(OsmWay { id: way_id, node_ids, tags });
                way_id
            }
            Geometry::Polygon { .. } => {
                let members = store.feature(fid).members.clone();
                let reuse_directly = members.len() == 1 && members[0].len() == 1 && !natural_collision(store, members[0][0], &tags);

                if reuse_directly {
                    let sid = members[0][0];
                    let way_id = segment_way_ids[&sid];
                    if let Some(&idx) = way_index.get(&way_id) {
                        doc.ways[idx].tags.extend(&tags);
                    }
                    way_id
                } else {
                    let mut rel_members = Vec::new();
                    for (ring_idx, ring_members) in members.iter().enumerate() {
                        let role = if ring_idx == 0 { RelationRole::Outer } else { RelationRole::Inner };
                        for &sid in ring_members {
                            if let Some(&way_id) = segment_way_ids.get(&sid) {
                                rel_members.push(RelationMember { way_id, role });
                            }
                        }
                    }
                    let mut rel_tags = tags;
                    rel_tags.set("type", "multipolygon");
                    let rel_id = ids.next();
                    doc.relations.push(OsmRelation { id: rel_id, tags: rel_tags, members: rel_members });
                    rel_id
                }
            }
        };
        store.feature_mut(fid).osm_id = Some(osm_id);
    }

    doc
}

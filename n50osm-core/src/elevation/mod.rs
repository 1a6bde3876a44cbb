//! the optional Elevation Pass (§4.6): reverses uphill-pointing streams and
//! tags lake elevations by sampling the elevations service. the actual HTTP
//! call (with its retry/backoff, §5) lives in `n50osm-cli`; this module only
//! needs a single-point lookup, exposed as [`ElevationSource`], so the core
//! crate stays free of any transport dependency.

use std::collections::HashMap;

use crate::error::N50Error;
use crate::geo::primitives::{centroid, multipolygon_area, point_in_multipolygon};
use crate::model::class::ObjectClass;
use crate::model::feature::{FeatureId, Geometry};
use crate::model::node::Node;
use crate::model::place::PlaceRecord;
use crate::store::Store;

/// area above which a nameless lake still gets an elevation sample (§4.6).
pub const LAKE_ELE_AREA_M2: f64 = 2_000.0;

/// a stream is reversed when the downhill direction disagrees with the
/// digitised direction by at least this many metres (§4.6).
const REVERSAL_THRESHOLD_M: f64 = 1.0;

/// below this magnitude the direction is annotated as ambiguous regardless
/// of whether a reversal happened (§4.6).
const AMBIGUITY_THRESHOLD_M: f64 = 2.0;

/// a single-point elevation lookup. `n50osm-cli`'s client wraps the real
/// HTTP call (with retry/backoff) behind this trait; tests can supply a
/// fixed lookup table instead.
pub trait ElevationSource {
    fn sample(&mut self, node: Node) -> Result<f64, N50Error>;
}

/// memoises an inner [`ElevationSource`] by node across the run (§5:
/// "Memoisation caches (elevation per node...) live for the run").
pub struct MemoizingElevationSource<'a> {
    inner: &'a mut dyn ElevationSource,
    cache: HashMap<Node, f64>,
}

impl<'a> MemoizingElevationSource<'a> {
    pub fn new(inner: &'a mut dyn ElevationSource) -> Self {
        MemoizingElevationSource { inner, cache: HashMap::new() }
    }
}

impl<'a> ElevationSource for MemoizingElevationSource<'a> {
    fn sample(&mut self, node: Node) -> Result<f64, N50Error> {
        if let Some(&ele) = self.cache.get(&node) {
            return Ok(ele);
        }
        let ele = self.inner.sample(node)?;
        self.cache.insert(node, ele);
        Ok(ele)
    }
}

fn is_stream_feature(geometry: &Geometry) -> bool {
    matches!(geometry, Geometry::LineString(_))
}

/// runs §4.6's stream-reversal pass over every LineString feature. must run
/// after the Node Coalescer, since coalescing can delete/nudge a stream's
/// interior nodes but never its endpoints.
pub fn reverse_streams(store: &mut Store, source: &mut dyn ElevationSource) -> Result<(), N50Error> {
    let mut source = MemoizingElevationSource::new(source);
    let ids: Vec<FeatureId> = store
        .live_feature_ids()
        .filter(|&id| is_stream_feature(&store.feature(id).geometry))
        .collect();

    for id in ids {
        let (first, last) = {
            let coords = match &store.feature(id).geometry {
                Geometry::LineString(c) => c,
                _ => continue,
            };
            let (Some(&f), Some(&l)) = (coords.first(), coords.last()) else { continue };
            (f, l)
        };
        if first == last {
            continue;
        }

        let ele_start = source.sample(first)?;
        let ele_end = source.sample(last)?;
        let delta = ele_end - ele_start;

        let feature = store.feature_mut(id);
        if delta >= REVERSAL_THRESHOLD_M {
            if let Geometry::LineString(coords) = &mut feature.geometry {
                coords.reverse();
            }
            feature.extras.insert("reversert".to_string(), format!("{delta:.2}"));
        } else if delta.abs() >= AMBIGUITY_THRESHOLD_M {
            feature.extras.insert("bekk".to_string(), format!("{delta:.2}"));
        }
        if delta.abs() < AMBIGUITY_THRESHOLD_M {
            feature.tags.set("fixme", "stream direction is ambiguous: start/end elevation differ by less than 2m");
        }
    }
    Ok(())
}

fn is_lake(class: &ObjectClass) -> bool {
    matches!(class, ObjectClass::Innsjø | ObjectClass::InnsjøRegulert)
}

/// picks the representative node a lake's elevation/debug anchor is sampled
/// at (§4.6): the nearest known name position if it falls inside the
/// multipolygon, else the outer-ring centroid if that falls inside, else
/// the first outer-ring node.
fn representative_node(outer: &[Node], inners: &[Vec<Node>], places: &[PlaceRecord]) -> Node {
    let name_anchor = places
        .iter()
        .map(|p| p.coordinate)
        .find(|&coord| point_in_multipolygon(coord, outer, inners));
    if let Some(anchor) = name_anchor {
        return anchor;
    }
    if let Some(c) = centroid(outer) {
        if point_in_multipolygon(c, outer, inners) {
            return c;
        }
    }
    outer[0]
}

/// runs §4.6's lake-elevation pass. `places` is the municipality's full set
/// of loaded SSR records (enrichment's disambiguation has not necessarily
/// run yet — only a coordinate test is needed here, not a tagged name), used
/// solely to decide whether a "known name position" exists near the lake.
pub fn tag_lake_elevations(
    store: &mut Store,
    source: &mut dyn ElevationSource,
    places: &[PlaceRecord],
    debug: bool,
    lake_ele_area_m2: f64,
) -> Result<(), N50Error> {
    let mut source = MemoizingElevationSource::new(source);
    let ids: Vec<FeatureId> = store
        .live_feature_ids()
        .filter(|&id| is_lake(&store.feature(id).class) && !store.feature(id).tags.contains_key("ele"))
        .collect();

    for id in ids {
        let (outer, inners) = {
            let geometry = &store.feature(id).geometry;
            let Geometry::Polygon { outer, inners } = geometry else { continue };
            (outer.clone(), inners.clone())
        };

        let area = multipolygon_area(&outer, &inners).unwrap_or(0.0).abs();
        let has_name_anchor = places.iter().any(|p| point_in_multipolygon(p.coordinate, &outer, &inners));
        if area < lake_ele_area_m2 && !has_name_anchor {
            continue;
        }

        let anchor = representative_node(&outer, &inners, places);
        let ele = source.sample(anchor)?;
        store.feature_mut(id).tags.set("ele", format!("{}", ele.round() as i64));

        if debug {
            let debug_id = store.push_feature(ObjectClass::Other("LakeEleAnchor".to_string()), Geometry::Point(anchor));
            store.feature_mut(debug_id).extras.insert("lake_ele_anchor".to_string(), format!("{id:?}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::feature::Geometry;

    struct FixedSource(HashMap<Node, f64>);
    impl ElevationSource for FixedSource {
        fn sample(&mut self, node: Node) -> Result<f64, N50Error> {
            Ok(*self.0.get(&node).unwrap_or(&0.0))
        }
    }

    #[test]
    fn uphill_stream_is_reversed_and_annotated() {
        let mut store = Store::new();
        let start = Node::new(10.0, 59.0);
        let end = Node::new(10.0, 59.1);
        let fid = store.push_feature(ObjectClass::ElvBekk, Geometry::LineString(vec![start, end]));

        let mut source = FixedSource([(start, 100.0), (end, 115.0)].into_iter().collect());
        reverse_streams(&mut store, &mut source).unwrap();

        match &store.feature(fid).geometry {
            Geometry::LineString(coords) => assert_eq!(coords, &vec![end, start]),
            _ => panic!(),
        }
        assert_eq!(store.feature(fid).extras.get("reversert"), Some(&"15.00".to_string()));
    }

    #[test]
    fn equal_elevation_stream_is_unchanged_but_flagged() {
        let mut store = Store::new();
        let start = Node::new(10.0, 59.0);
        let end = Node::new(10.0, 59.1);
        let fid = store.push_feature(ObjectClass::ElvBekk, Geometry::LineString(vec![start, end]));

        let mut source = FixedSource([(start, 50.0), (end, 50.0)].into_iter().collect());
        reverse_streams(&mut store, &mut source).unwrap();

        match &store.feature(fid).geometry {
            Geometry::LineString(coords) => assert_eq!(coords, &vec![start, end]),
            _ => panic!(),
        }
        assert!(store.feature(fid).tags.get("fixme").is_some());
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let mut store = Store::new();
        let start = Node::new(10.0, 59.0);
        let end = Node::new(10.0, 59.1);
        store.push_feature(ObjectClass::ElvBekk, Geometry::LineString(vec![start, end]));
        let mut source = FixedSource([(start, 100.0), (end, 115.0)].into_iter().collect());
        reverse_streams(&mut store, &mut source).unwrap();
        let before = store.features.clone();
        reverse_streams(&mut store, &mut source).unwrap();
        for (a, b) in before.iter().zip(store.features.iter()) {
            match (&a.geometry, &b.geometry) {
                (Geometry::LineString(x), Geometry::LineString(y)) => assert_eq!(x, y),
                _ => panic!(),
            }
        }
    }
}

use std::collections::BTreeMap;

use super::xml::XmlElement;
use crate::error::N50Error;
use crate::geo::projection::Reprojector;
use crate::model::node::Node;

/// geometry-kind property names recognised under a feature element (§4.1).
pub const GEOMETRY_KINDS: &[&str] = &["posisjon", "grense", "område", "senterlinje", "geometri"];

#[derive(Debug, Clone)]
pub enum RawGeometry {
    Point(Node),
    LineString(Vec<Node>),
    Polygon { outer: Vec<Node>, inners: Vec<Vec<Node>> },
}

pub struct DecodedFeature {
    pub gml_id: Option<String>,
    pub class_name: String,
    pub geometry_kind: &'static str,
    pub geometry: RawGeometry,
    pub attributes: BTreeMap<String, String>,
}

/// decodes one `gml:featureMember`'s wrapped element, already parsed into a
/// tree by [`super::xml::parse_feature_members`].
pub fn decode_feature(el: &XmlElement, reproj: &Reprojector) -> Result<Option<DecodedFeature>, N50Error> {
    let Some((kind, geom_el)) = find_geometry_property(el) else {
        log::warn!("feature {:?} has no recognised geometry property; dropped", el.attr("id"));
        return Ok(None);
    };

    let geometry = match decode_geometry(geom_el, reproj)? {
        Some(g) => g,
        None => {
            log::warn!("feature {:?} geometry could not be decoded; dropped", el.attr("id"));
            return Ok(None);
        }
    };

    let mut attributes = BTreeMap::new();
    collect_attribute_leaves(el, geom_el, &mut attributes);

    Ok(Some(DecodedFeature {
        gml_id: el.attr("id").map(str::to_string),
        class_name: el.name.clone(),
        geometry_kind: kind,
        geometry,
        attributes,
    }))
}

fn find_geometry_property<'a>(el: &'a XmlElement) -> Option<(&'static str, &'a XmlElement)> {
    for kind in GEOMETRY_KINDS {
        if let Some(child) = el.child(kind) {
            return Some((kind, child));
        }
    }
    None
}

/// recursively walks every leaf element of `el` except the geometry property
/// subtree, collecting `local-name -> text` (§4.1: "collect all attribute
/// leaves into a flat key→value map by recursively walking the feature
/// namespace subtree").
fn collect_attribute_leaves(el: &XmlElement, geometry_el: &XmlElement, out: &mut BTreeMap<String, String>) {
    for child in &el.children {
        if std::ptr::eq(child, geometry_el) {
            continue;
        }
        if child.is_leaf() {
            if !child.text.is_empty() {
                out.insert(child.name.clone(), child.text.clone());
            }
        } else {
            collect_attribute_leaves(child, geometry_el, out);
        }
    }
}

fn find_all<'a>(el: &'a XmlElement, name: &str, out: &mut Vec<&'a XmlElement>) {
    for child in &el.children {
        if child.name == name {
            out.push(child);
        }
        find_all(child, name, out);
    }
}

fn find_first<'a>(el: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    let mut v = Vec::new();
    find_all(el, name, &mut v);
    v.into_iter().next()
}

fn parse_coord_pairs(text: &str, reproj: &Reprojector) -> Result<Vec<Node>, N50Error> {
    let nums: Result<Vec<f64>, _> = text.split_whitespace().map(|s| s.parse::<f64>()).collect();
    let nums = nums.map_err(|e| N50Error::Internal(format!("bad coordinate list: {e}")))?;
    let mut out = Vec::with_capacity(nums.len() / 2);
    for pair in nums.chunks_exact(2) {
        out.push(reproj.reproject(pair[0], pair[1])?);
    }
    Ok(out)
}

fn decode_linear_ring(ring_holder: &XmlElement, reproj: &Reprojector) -> Result<Option<Vec<Node>>, N50Error> {
    let Some(pos_list) = find_first(ring_holder, "posList") else {
        return Ok(None);
    };
    let mut coords = parse_coord_pairs(&pos_list.text, reproj)?;
    super::cleanup::clean(&mut coords);
    Ok(Some(coords))
}

fn decode_curve(curve_el: &XmlElement, reproj: &Reprojector) -> Result<Option<Vec<Node>>, N50Error> {
    let mut segments = Vec::new();
    find_all(curve_el, "LineStringSegment", &mut segments);
    if segments.is_empty() {
        // a bare gml:LineString has a direct posList with no segments wrapper.
        return decode_linear_ring(curve_el, reproj);
    }
    let mut coords: Vec<Node> = Vec::new();
    for (i, seg) in segments.iter().enumerate() {
        let Some(pos_list) = find_first(seg, "posList") else { continue };
        let patch = parse_coord_pairs(&pos_list.text, reproj)?;
        if patch.is_empty() {
            continue;
        }
        // §4.1 / §9: later patches are joined without duplicating their
        // first node; concatenation (not single-patch retention) is the
        // behaviour this spec settles on.
        if i == 0 || coords.is_empty() {
            coords.extend(patch);
        } else {
            coords.extend(patch.into_iter().skip(1));
        }
    }
    if coords.is_empty() {
        return Ok(None);
    }
    super::cleanup::clean(&mut coords);
    Ok(Some(coords))
}

fn decode_geometry(geom_el: &XmlElement, reproj: &Reprojector) -> Result<Option<RawGeometry>, N50Error> {
    if let Some(point_el) = find_first(geom_el, "Point") {
        let Some(pos) = find_first(point_el, "pos") else { return Ok(None) };
        let coords = parse_coord_pairs(&pos.text, reproj)?;
        return Ok(coords.into_iter().next().map(RawGeometry::Point));
    }

    if find_first(geom_el, "Curve").is_some() || find_first(geom_el, "LineString").is_some() {
        return Ok(decode_curve(geom_el, reproj)?.map(RawGeometry::LineString));
    }

    if find_first(geom_el, "Surface").is_some() || find_first(geom_el, "Polygon").is_some() {
        let mut exteriors = Vec::new();
        find_all(geom_el, "exterior", &mut exteriors);
        let Some(ext) = exteriors.into_iter().next() else { return Ok(None) };
        let Some(outer) = decode_linear_ring(ext, reproj)? else { return Ok(None) };

        let mut interiors = Vec::new();
        find_all(geom_el, "interior", &mut interiors);
        let mut inners = Vec::new();
        for interior in interiors {
            if let Some(ring) = decode_linear_ring(interior, reproj)? {
                inners.push(ring);
            }
        }
        return Ok(Some(RawGeometry::Polygon { outer, inners }));
    }

    log::warn!("unrecognised geometry shape under '{}'", geom_el.name);
    Ok(None)
}

/// a ring is malformed (§4.1/§7 error policy) if it has fewer than 3 distinct
/// points or fails to close.
pub fn ring_is_malformed(ring: &[Node]) -> bool {
    if ring.len() < 4 {
        return true;
    }
    if ring.first() != ring.last() {
        return true;
    }
    let distinct: std::collections::HashSet<_> = ring[..ring.len() - 1].iter().collect();
    distinct.len() < 3
}

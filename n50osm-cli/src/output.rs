//! serialises a pipeline result to disk (§6): pretty-printed OSM XML with
//! two-space indents for the topology path, or raw GeoJSON for `--geojson`
//! mode. Neither writer is core-crate business — `n50osm-core::emit`
//! produces plain node/way/relation structs and never touches a filesystem
//! or a serialisation format, exactly the seam §1 draws around it.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde_json::{json, Map, Value};

use n50osm_core::emit::{OsmDocument, RelationRole};
use n50osm_core::model::feature::{Feature, Geometry};
use n50osm_core::model::segment::Segment;
use n50osm_core::N50Error;

/// the generator string stamped on every emitted document's root element (§6).
pub const GENERATOR: &str = concat!("n50osm v", env!("CARGO_PKG_VERSION"));

fn xml_err(e: quick_xml::Error) -> N50Error {
    N50Error::Xml(e)
}

/// writes `doc` as OSM XML 0.6, `action="modify"` on every element, two-space
/// indents (§6). every node/way/relation id is already a negative
/// provisional id assigned by `emit::emit`.
pub fn write_osm_xml(doc: &OsmDocument) -> Result<Vec<u8>, N50Error> {
    let mut buf = Vec::new();
    {
        let mut writer = Writer::new_with_indent(Cursor::new(&mut buf), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))).map_err(xml_err)?;

        let mut root = BytesStart::new("osm");
        root.push_attribute(("version", "0.6"));
        root.push_attribute(("generator", GENERATOR));
        root.push_attribute(("upload", "false"));
        writer.write_event(Event::Start(root)).map_err(xml_err)?;

        for node in &doc.nodes {
            write_node(&mut writer, node.id, node.node.lon(), node.node.lat(), node.tags.iter())?;
        }
        for way in &doc.ways {
            write_way(&mut writer, way.id, &way.node_ids, way.tags.iter())?;
        }
        for rel in &doc.relations {
            write_relation(&mut writer, rel)?;
        }

        writer.write_event(Event::End(BytesEnd::new("osm"))).map_err(xml_err)?;
    }
    buf.push(b'\n');
    Ok(buf)
}

fn write_node<'a>(
    writer: &mut Writer<Cursor<&mut Vec<u8>>>,
    id: i64,
    lon: f64,
    lat: f64,
    tags: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(), N50Error> {
    let mut start = BytesStart::new("node");
    start.push_attribute(("id", id.to_string().as_str()));
    start.push_attribute(("action", "modify"));
    start.push_attribute(("lat", format!("{lat:.7}").as_str()));
    start.push_attribute(("lon", format!("{lon:.7}").as_str()));
    write_with_tags(writer, start, "node", tags)
}

fn write_way<'a>(
    writer: &mut Writer<Cursor<&mut Vec<u8>>>,
    id: i64,
    node_ids: &[i64],
    tags: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(), N50Error> {
    let mut start = BytesStart::new("way");
    start.push_attribute(("id", id.to_string().as_str()));
    start.push_attribute(("action", "modify"));
    writer.write_event(Event::Start(start)).map_err(xml_err)?;

    for nd in node_ids {
        let mut nd_el = BytesStart::new("nd");
        nd_el.push_attribute(("ref", nd.to_string().as_str()));
        writer.write_event(Event::Empty(nd_el)).map_err(xml_err)?;
    }
    write_tags(writer, tags)?;
    writer.write_event(Event::End(BytesEnd::new("way"))).map_err(xml_err)
}

fn write_relation(writer: &mut Writer<Cursor<&mut Vec<u8>>>, rel: &n50osm_core::emit::OsmRelation) -> Result<(), N50Error> {
    let mut start = BytesStart::new("relation");
    start.push_attribute(("id", rel.id.to_string().as_str()));
    start.push_attribute(("action", "modify"));
    writer.write_event(Event::Start(start)).map_err(xml_err)?;

    for member in &rel.members {
        let mut member_el = BytesStart::new("member");
        member_el.push_attribute(("type", "way"));
        member_el.push_attribute(("ref", member.way_id.to_string().as_str()));
        member_el.push_attribute(("role", role_str(member.role)));
        writer.write_event(Event::Empty(member_el)).map_err(xml_err)?;
    }
    write_tags(writer, rel.tags.iter())?;
    writer.write_event(Event::End(BytesEnd::new("relation"))).map_err(xml_err)
}

fn role_str(role: RelationRole) -> &'static str {
    role.as_str()
}

fn write_with_tags<'a>(
    writer: &mut Writer<Cursor<&mut Vec<u8>>>,
    start: BytesStart,
    tag_name: &str,
    tags: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(), N50Error> {
    let mut tags = tags.peekable();
    if tags.peek().is_none() {
        writer.write_event(Event::Empty(start)).map_err(xml_err)
    } else {
        writer.write_event(Event::Start(start)).map_err(xml_err)?;
        write_tags(writer, tags)?;
        writer.write_event(Event::End(BytesEnd::new(tag_name))).map_err(xml_err)
    }
}

fn write_tags<'a>(writer: &mut Writer<Cursor<&mut Vec<u8>>>, tags: impl Iterator<Item = (&'a str, &'a str)>) -> Result<(), N50Error> {
    for (k, v) in tags {
        let mut tag_el = BytesStart::new("tag");
        tag_el.push_attribute(("k", k));
        tag_el.push_attribute(("v", v));
        writer.write_event(Event::Empty(tag_el)).map_err(xml_err)?;
    }
    Ok(())
}

/// `--geojson` mode (§4.1/§6): writes the pre-decomposition feature and
/// segment pools as a plain `FeatureCollection`, with each feature's
/// `extras` and `tags` folded into its `properties` object.
pub fn write_geojson(features: &[Feature], segments: &[Segment]) -> Result<Vec<u8>, N50Error> {
    let mut entries = Vec::with_capacity(features.len() + segments.len());

    for feature in features {
        let geometry = match &feature.geometry {
            Geometry::Point(n) => json!({"type": "Point", "coordinates": [n.lon(), n.lat()]}),
            Geometry::LineString(coords) => json!({"type": "LineString", "coordinates": coords_json(coords)}),
            Geometry::Polygon { outer, inners } => {
                let mut rings = vec![coords_json(outer)];
                rings.extend(inners.iter().map(|r| coords_json(r)));
                json!({"type": "Polygon", "coordinates": rings})
            }
        };
        let mut properties: Map<String, Value> = feature.extras.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect();
        for (k, v) in feature.tags.iter() {
            properties.insert(k.to_string(), Value::String(v.to_string()));
        }
        if let Some(id) = &feature.gml_id {
            properties.insert("gml_id".to_string(), Value::String(id.clone()));
        }
        entries.push(json!({"type": "Feature", "geometry": geometry, "properties": properties}));
    }

    for segment in segments {
        let geometry = json!({"type": "LineString", "coordinates": coords_json(&segment.coords)});
        let mut properties: Map<String, Value> = Map::new();
        for (k, v) in segment.tags.iter() {
            properties.insert(k.to_string(), Value::String(v.to_string()));
        }
        if let Some(id) = &segment.gml_id {
            properties.insert("gml_id".to_string(), Value::String(id.clone()));
        }
        entries.push(json!({"type": "Feature", "geometry": geometry, "properties": properties}));
    }

    let collection = json!({"type": "FeatureCollection", "features": entries});
    serde_json::to_vec_pretty(&collection).map_err(N50Error::Json)
}

fn coords_json(coords: &[n50osm_core::model::node::Node]) -> Vec<[f64; 2]> {
    coords.iter().map(|n| [n.lon(), n.lat()]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use n50osm_core::emit::{OsmNode, OsmWay};
    use n50osm_core::model::node::Node;
    use n50osm_core::model::tags::Tags;

    #[test]
    fn writes_a_minimal_document_with_declaration_and_root_attrs() {
        let mut tags = Tags::new();
        tags.set("natural", "water");
        let doc = OsmDocument {
            nodes: vec![OsmNode { id: -1001, node: Node::new(10.0, 59.0), tags: Tags::new() }],
            ways: vec![OsmWay { id: -1002, node_ids: vec![-1001], tags }],
            relations: vec![],
        };
        let xml = String::from_utf8(write_osm_xml(&doc).unwrap()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<osm version=\"0.6\""));
        assert!(xml.contains("action=\"modify\""));
        assert!(xml.contains("k=\"natural\" v=\"water\""));
    }

    #[test]
    fn geojson_output_is_a_feature_collection() {
        let features = Vec::new();
        let segments = Vec::new();
        let bytes = write_geojson(&features, &segments).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["type"], "FeatureCollection");
        assert!(parsed["features"].as_array().unwrap().is_empty());
    }
}

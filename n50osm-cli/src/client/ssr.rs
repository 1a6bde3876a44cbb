use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;

use n50osm_core::model::node::Node;
use n50osm_core::model::place::PlaceRecord;
use n50osm_core::N50Error;

use super::transport_err;

fn local_name(name: QName) -> String {
    let bytes = name.as_ref();
    match bytes.iter().position(|&b| b == b':') {
        Some(i) => String::from_utf8_lossy(&bytes[i + 1..]).into_owned(),
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn attr_value(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    e.attributes().flatten().find(|a| a.key.as_ref() == key).map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

struct PendingNode {
    coord: Node,
    name: Option<String>,
    ssr_type: Option<String>,
    ssr_id: String,
}

/// downloads and decodes the pre-converted SSR-to-OSM name extract for one
/// municipality (§6). the source is already OSM-XML-shaped: plain nodes
/// tagged `name`/`ssr:type`.
pub fn fetch_places(client: &reqwest::blocking::Client, base_url: &str, municipality_id: &str) -> Result<Vec<PlaceRecord>, N50Error> {
    let url = format!("{base_url}/ssr2_to_osm_data/data/{municipality_id}/{municipality_id}.osm");
    let resp = client.get(&url).send().map_err(transport_err)?;
    if !resp.status().is_success() {
        return Err(N50Error::Transport(format!("GET {url} returned {}", resp.status())));
    }
    let bytes = resp.bytes().map_err(transport_err)?;
    parse_ssr_osm(&bytes)
}

fn parse_ssr_osm(bytes: &[u8]) -> Result<Vec<PlaceRecord>, N50Error> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut places = Vec::new();
    let mut current: Option<PendingNode> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let local = local_name(e.name());
                if local == "node" {
                    let lat = attr_value(&e, b"lat").and_then(|s| s.parse::<f64>().ok());
                    let lon = attr_value(&e, b"lon").and_then(|s| s.parse::<f64>().ok());
                    let id = attr_value(&e, b"id");
                    if let (Some(lat), Some(lon), Some(id)) = (lat, lon, id) {
                        current = Some(PendingNode { coord: Node::new(lon, lat), name: None, ssr_type: None, ssr_id: id });
                    }
                }
            }
            Event::Empty(e) => {
                if local_name(e.name()) == "tag" {
                    if let Some(node) = current.as_mut() {
                        let k = attr_value(&e, b"k");
                        let v = attr_value(&e, b"v");
                        if let (Some(k), Some(v)) = (k, v) {
                            match k.as_str() {
                                "name" => node.name = Some(v),
                                "ssr:type" => node.ssr_type = Some(v),
                                _ => {}
                            }
                        }
                    }
                }
            }
            Event::End(e) => {
                if local_name(e.name()) == "node" {
                    if let Some(node) = current.take() {
                        if let (Some(name), Some(ssr_type)) = (node.name, node.ssr_type) {
                            places.push(PlaceRecord { coordinate: node.coord, name, ssr_type, ssr_id: node.ssr_id });
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(places)
}

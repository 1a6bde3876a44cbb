use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::N50Error;

/// a minimal DOM-ish tree over one XML subtree, local names only (namespace
/// prefixes stripped). built eagerly per `gml:featureMember` so the rest of
/// ingest can walk it with ordinary recursion instead of juggling a
/// streaming cursor through arbitrarily nested geometry/attribute shapes.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == local_name)
    }

    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == local_name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn attr(&self, local_name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| strip_ns(k) == local_name)
            .map(|(_, v)| v.as_str())
    }
}

fn strip_ns(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}

/// parse every top-level `gml:featureMember` (or `wfs:member`) in a byte
/// stream into a tree whose root is the single feature element it wraps.
pub fn parse_feature_members(bytes: &[u8]) -> Result<Vec<XmlElement>, N50Error> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut members = Vec::new();
    let mut buf = Vec::new();
    let mut depth_in_member: Option<Vec<XmlElement>> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = strip_ns(&String::from_utf8_lossy(e.name().as_ref())).to_string();
                if depth_in_member.is_none() {
                    if name == "featureMember" || name == "member" {
                        depth_in_member = Some(Vec::new());
                    }
                } else {
                    let stack = depth_in_member.as_mut().unwrap();
                    let attrs = read_attrs(&e)?;
                    stack.push(XmlElement {
                        name,
                        attrs,
                        text: String::new(),
                        children: Vec::new(),
                    });
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(stack) = depth_in_member.as_mut() {
                    let name = strip_ns(&String::from_utf8_lossy(e.name().as_ref())).to_string();
                    let attrs = read_attrs(&e)?;
                    let leaf = XmlElement {
                        name,
                        attrs,
                        text: String::new(),
                        children: Vec::new(),
                    };
                    attach(stack, leaf);
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(stack) = depth_in_member.as_mut() {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&t.unescape().unwrap_or_default());
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = strip_ns(&String::from_utf8_lossy(e.name().as_ref())).to_string();
                if let Some(stack) = depth_in_member.as_mut() {
                    if name == "featureMember" || name == "member" {
                        // the wrapper closes with nothing left on the stack
                        // beyond the single feature element, already attached.
                        let finished = depth_in_member.take().unwrap();
                        members.extend(finished.into_iter());
                    } else if let Some(done) = stack.pop() {
                        attach(stack, done);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(N50Error::Xml(e)),
        }
        buf.clear();
    }

    Ok(members)
}

fn attach(stack: &mut Vec<XmlElement>, child: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(child);
    } else {
        stack.push(child);
    }
}

fn read_attrs(e: &quick_xml::events::BytesStart) -> Result<Vec<(String, String)>, N50Error> {
    let mut out = Vec::new();
    for a in e.attributes() {
        let a = a.map_err(quick_xml::Error::InvalidAttr).map_err(N50Error::Xml)?;
        let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
        let value = a.unescape_value().unwrap_or_default().to_string();
        out.push((key, value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_feature_member() {
        let xml = br#"<gml:FeatureCollection xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:app="http://example.org">
            <gml:featureMember>
                <app:Innsjø gml:id="x1">
                    <app:navn>Testvatnet</app:navn>
                </app:Innsjø>
            </gml:featureMember>
        </gml:FeatureCollection>"#;
        let members = parse_feature_members(xml).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Innsjø");
        assert_eq!(members[0].attr("id"), Some("x1"));
        assert_eq!(members[0].child("navn").unwrap().text, "Testvatnet");
    }
}

use super::node::Node;

/// a name record loaded from the SSR names service (§6).
#[derive(Debug, Clone)]
pub struct PlaceRecord {
    pub coordinate: Node,
    pub name: String,
    pub ssr_type: String,
    pub ssr_id: String,
}

use crate::model::node::Node;

/// mean earth radius used for the local equirectangular projection (§4.8).
pub const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// a ring's area classifies as an island (vs. islet) at this threshold.
pub const ISLAND_AREA_M2: f64 = 100_000.0;

/// axis-aligned bounding box over a set of nodes, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn of(coords: &[Node]) -> Self {
        let mut b = BBox {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        };
        for n in coords {
            b.min_lon = b.min_lon.min(n.lon());
            b.min_lat = b.min_lat.min(n.lat());
            b.max_lon = b.max_lon.max(n.lon());
            b.max_lat = b.max_lat.max(n.lat());
        }
        b
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }

    /// grow the box outward by `metres` on every side, for Point enrichment
    /// candidates (§4.7).
    pub fn expanded_by(&self, metres: f64) -> BBox {
        let mid_lat = (self.min_lat + self.max_lat) / 2.0;
        let (dlon, dlat) = offset_degrees(metres, mid_lat);
        BBox {
            min_lon: self.min_lon - dlon,
            min_lat: self.min_lat - dlat,
            max_lon: self.max_lon + dlon,
            max_lat: self.max_lat + dlat,
        }
    }

    pub fn contains_point(&self, n: Node) -> bool {
        n.lon() >= self.min_lon && n.lon() <= self.max_lon && n.lat() >= self.min_lat && n.lat() <= self.max_lat
    }
}

/// `Δlat = d/R`, `Δlon = d/(R·cos lat)`, both in degrees (§4.8).
pub fn offset_degrees(metres: f64, at_lat_deg: f64) -> (f64, f64) {
    let lat_rad = at_lat_deg.to_radians();
    let dlat = (metres / EARTH_RADIUS_M).to_degrees();
    let dlon = (metres / (EARTH_RADIUS_M * lat_rad.cos())).to_degrees();
    (dlon, dlat)
}

/// local equirectangular projection about the ring (§4.8): `y = lat·(πR/180)`,
/// `x = lon·(πR/180)·cos(lat)`. returns `(x, y)` in metres.
fn project(n: Node) -> (f64, f64) {
    let k = std::f64::consts::PI * EARTH_RADIUS_M / 180.0;
    let y = n.lat() * k;
    let x = n.lon() * k * n.lat().to_radians().cos();
    (x, y)
}

/// signed planar area of a closed ring under the §4.8 projection. negative
/// for clockwise rings (OSM outer convention), positive for counter-clockwise
/// (inner ring / island).
pub fn signed_area(ring: &[Node]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let pts: Vec<(f64, f64)> = ring.iter().map(|n| project(*n)).collect();
    let mut sum = 0.0;
    for i in 0..pts.len() - 1 {
        let (x0, y0) = pts[i];
        let (x1, y1) = pts[i + 1];
        sum += (x1 - x0) * (y1 + y0);
    }
    sum / 2.0
}

/// multipolygon area: outer minus each inner ring that has a defined area.
/// `None` if any inner ring is open (not closed).
pub fn multipolygon_area(outer: &[Node], inners: &[Vec<Node>]) -> Option<f64> {
    for inner in inners {
        if inner.len() < 2 || inner.first() != inner.last() {
            return None;
        }
    }
    let outer_area = signed_area(outer).abs();
    let inner_area: f64 = inners.iter().map(|r| signed_area(r).abs()).sum();
    Some(outer_area - inner_area)
}

/// shoelace centroid of a closed ring, in (lon, lat) degrees.
pub fn centroid(ring: &[Node]) -> Option<Node> {
    if ring.len() < 3 {
        return None;
    }
    let pts: Vec<(f64, f64)> = ring.iter().map(|n| project(*n)).collect();
    let mut a = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..pts.len() - 1 {
        let (x0, y0) = pts[i];
        let (x1, y1) = pts[i + 1];
        let cross = x0 * y1 - x1 * y0;
        a += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    a /= 2.0;
    if a.abs() < f64::EPSILON {
        return None;
    }
    cx /= 6.0 * a;
    cy /= 6.0 * a;
    // invert the projection about the ring's own mean latitude.
    let mean_lat: f64 = ring.iter().map(|n| n.lat()).sum::<f64>() / ring.len() as f64;
    let k = std::f64::consts::PI * EARTH_RADIUS_M / 180.0;
    let lat = cy / k;
    let lon = cx / (k * mean_lat.to_radians().cos());
    Some(Node::new(lon, lat))
}

/// horizontal-ray point-in-polygon test against a single (not necessarily
/// closed-orientation-aware) ring.
pub fn point_in_ring(point: Node, ring: &[Node]) -> bool {
    let x = point.lon();
    let y = point.lat();
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].lon(), ring[i].lat());
        let (xj, yj) = (ring[j].lon(), ring[j].lat());
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// inside-outer ∧ outside-all-inner (§4.8).
pub fn point_in_multipolygon(point: Node, outer: &[Node], inners: &[Vec<Node>]) -> bool {
    point_in_ring(point, outer) && inners.iter().all(|inner| !point_in_ring(point, inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(a: f64) -> Vec<Node> {
        vec![
            Node::new(0.0, 0.0),
            Node::new(0.0, a),
            Node::new(a, a),
            Node::new(a, 0.0),
            Node::new(0.0, 0.0),
        ]
    }

    #[test]
    fn clockwise_square_has_negative_area() {
        // (0,0)-(a,0)-(a,a)-(0,a)-(0,0) goes clockwise in (lon=x, lat=y).
        let ring = vec![
            Node::new(0.0, 0.0),
            Node::new(1.0, 0.0),
            Node::new(1.0, 1.0),
            Node::new(0.0, 1.0),
            Node::new(0.0, 0.0),
        ];
        assert!(signed_area(&ring) < 0.0);
    }

    #[test]
    fn counter_clockwise_square_has_positive_area() {
        assert!(signed_area(&square(1.0)) > 0.0);
    }

    #[test]
    fn island_area_threshold_is_inclusive() {
        // construct a ring whose |area| is as close as practical to the threshold;
        // exact boundary behaviour is exercised at the island-detector level.
        assert!(ISLAND_AREA_M2 == 100_000.0);
    }

    #[test]
    fn centroid_of_unit_square_is_center() {
        let ring = square(0.001); // small enough that projection distortion is negligible
        let c = centroid(&ring).unwrap();
        assert!((c.lon() - 0.0005).abs() < 1e-6);
        assert!((c.lat() - 0.0005).abs() < 1e-6);
    }

    #[test]
    fn point_in_ring_basic() {
        let ring = square(10.0);
        assert!(point_in_ring(Node::new(5.0, 5.0), &ring));
        assert!(!point_in_ring(Node::new(50.0, 50.0), &ring));
    }

    #[test]
    fn point_in_multipolygon_excludes_holes() {
        let outer = square(10.0);
        let inner = vec![
            Node::new(2.0, 2.0),
            Node::new(2.0, 3.0),
            Node::new(3.0, 3.0),
            Node::new(3.0, 2.0),
            Node::new(2.0, 2.0),
        ];
        assert!(point_in_multipolygon(Node::new(8.0, 8.0), &outer, &[inner.clone()]));
        assert!(!point_in_multipolygon(Node::new(2.5, 2.5), &outer, &[inner]));
    }
}

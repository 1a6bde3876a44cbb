use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::error::N50Error;
use crate::model::node::Node;

/// N50 GML is published in ETRS89 / UTM zone 33N (EPSG:25833); the pipeline
/// works in WGS84 lon/lat throughout, matching what OSM expects.
const UTM33N_PROJ4: &str = "+proj=utm +zone=33 +ellps=GRS80 +towgs84=0,0,0 +units=m +no_defs";
const WGS84_PROJ4: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

pub struct Reprojector {
    from: Proj,
    to: Proj,
}

impl Reprojector {
    pub fn utm33n_to_wgs84() -> Result<Self, N50Error> {
        let from = Proj::from_proj_string(UTM33N_PROJ4)
            .map_err(|e| N50Error::Internal(format!("building UTM33N projection: {e}")))?;
        let to = Proj::from_proj_string(WGS84_PROJ4)
            .map_err(|e| N50Error::Internal(format!("building WGS84 projection: {e}")))?;
        Ok(Reprojector { from, to })
    }

    /// reproject a single `(easting, northing)` pair to `Node(lon, lat)`,
    /// rounded to [`crate::model::node::COORDINATE_DECIMALS`] by `Node::new`.
    pub fn reproject(&self, easting: f64, northing: f64) -> Result<Node, N50Error> {
        let mut point = (easting, northing, 0.0_f64);
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| N50Error::Internal(format!("reprojecting ({easting}, {northing}): {e}")))?;
        Ok(Node::new(point.0.to_degrees(), point.1.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oslo_roughly_lands_where_expected() {
        let r = Reprojector::utm33n_to_wgs84().unwrap();
        // central Oslo, UTM33N.
        let n = r.reproject(597_000.0, 6_643_000.0).unwrap();
        assert!((n.lon() - 10.74).abs() < 0.1);
        assert!((n.lat() - 59.91).abs() < 0.1);
    }
}

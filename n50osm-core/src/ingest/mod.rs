pub mod cleanup;
pub mod gml;
pub mod xml;

use std::str::FromStr;

use crate::error::N50Error;
use crate::geo::projection::Reprojector;
use crate::model::class::ObjectClass;
use crate::model::feature::Geometry;
use crate::model::tags::Tags;
use crate::store::Store;
use gml::RawGeometry;

/// classes treated as "avoided" unless raw mode requests everything (§4.1).
/// `--geojson` means "raw" in the CLI's sense, but avoidance is keyed off
/// `ObjectClass::is_avoided` independently, so the flag is threaded through
/// explicitly here rather than inferred from other toggles.
pub struct IngestOptions {
    pub keep_avoided_classes: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions { keep_avoided_classes: false }
    }
}

/// decodes a whole GML byte stream into the store's feature and segment
/// pools (§4.1). returns the number of features dropped for being malformed
/// or unroutable, for caller-side diagnostics.
pub fn ingest(bytes: &[u8], options: &IngestOptions, store: &mut Store) -> Result<usize, N50Error> {
    let reproj = Reprojector::utm33n_to_wgs84()?;
    let members = xml::parse_feature_members(bytes)?;
    let mut dropped = 0;

    for member in &members {
        let class: ObjectClass = ObjectClass::from_str(&member.name).expect("ObjectClass::from_str is infallible");

        if class.is_avoided() && !options.keep_avoided_classes {
            continue;
        }

        let Some(decoded) = gml::decode_feature(member, &reproj)? else {
            dropped += 1;
            continue;
        };

        let extras = std::iter::once(("gml_class".to_string(), decoded.class_name.clone()))
            .chain(decoded.attributes.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect::<std::collections::BTreeMap<_, _>>();

        match decoded.geometry {
            RawGeometry::Point(node) => {
                let fid = store.push_feature(class, Geometry::Point(node));
                let f = store.feature_mut(fid);
                f.extras = extras;
                f.gml_id = decoded.gml_id;
            }
            RawGeometry::LineString(coords) => {
                if coords.len() < 2 {
                    log::warn!("dropping degenerate linestring {:?}", decoded.gml_id);
                    dropped += 1;
                    continue;
                }
                if decoded.geometry_kind == "grense" {
                    let sid = store.push_segment(class, coords);
                    let s = store.segment_mut(sid);
                    s.gml_id = decoded.gml_id;
                    attach_segment_tags(s, &extras);
                } else {
                    let fid = store.push_feature(class, Geometry::LineString(coords));
                    let f = store.feature_mut(fid);
                    f.extras = extras;
                    f.gml_id = decoded.gml_id;
                }
            }
            RawGeometry::Polygon { outer, inners } => {
                if gml::ring_is_malformed(&outer) {
                    log::warn!("dropping polygon with malformed outer ring {:?}", decoded.gml_id);
                    dropped += 1;
                    continue;
                }
                let mut kept_inners = Vec::new();
                for inner in inners {
                    if gml::ring_is_malformed(&inner) {
                        log::warn!("dropping malformed inner ring on {:?}", decoded.gml_id);
                        continue;
                    }
                    kept_inners.push(inner);
                }
                let fid = store.push_feature(class, Geometry::Polygon { outer, inners: kept_inners });
                let f = store.feature_mut(fid);
                f.extras = extras;
                f.gml_id = decoded.gml_id;
            }
        }
    }

    Ok(dropped)
}

/// stashes the raw attribute leaves on a freshly-ingested segment as tags;
/// the Classifier (§4.2) is the authority on final OSM tags, but carrying
/// the source attributes through lets later stages and `--tag` debug output
/// see them without a second pass over the GML.
fn attach_segment_tags(segment: &mut crate::model::segment::Segment, extras: &std::collections::BTreeMap<String, String>) {
    let mut tags = Tags::new();
    for (k, v) in extras {
        tags.set(format!("n50_raw:{k}"), v.clone());
    }
    segment.tags = tags;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_gml() -> Vec<u8> {
        br#"<gml:FeatureCollection xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:app="http://example.org">
            <gml:featureMember>
                <app:Innsjø gml:id="w1">
                    <app:område>
                        <gml:Surface><gml:patches><gml:PolygonPatch>
                            <gml:exterior><gml:LinearRing><gml:posList>
                                597000 6643000 597200 6643000 597200 6643200 597000 6643200 597000 6643000
                            </gml:posList></gml:LinearRing></gml:exterior>
                        </gml:PolygonPatch></gml:patches></gml:Surface>
                    </app:område>
                </app:Innsjø>
            </gml:featureMember>
            <gml:featureMember>
                <app:Innsjøkant gml:id="s1">
                    <app:grense>
                        <gml:Curve><gml:segments><gml:LineStringSegment>
                            <gml:posList>597000 6643000 597200 6643000</gml:posList>
                        </gml:LineStringSegment></gml:segments></gml:Curve>
                    </app:grense>
                </app:Innsjøkant>
            </gml:featureMember>
            <gml:featureMember>
                <app:Tregruppe gml:id="t1">
                    <app:område>
                        <gml:Surface><gml:patches><gml:PolygonPatch>
                            <gml:exterior><gml:LinearRing><gml:posList>
                                597000 6643000 597010 6643000 597010 6643010 597000 6643000
                            </gml:posList></gml:LinearRing></gml:exterior>
                        </gml:PolygonPatch></gml:patches></gml:Surface>
                    </app:område>
                </app:Tregruppe>
            </gml:featureMember>
        </gml:FeatureCollection>"#
            .to_vec()
    }

    #[test]
    fn routes_grense_geometry_to_segment_pool() {
        let mut store = Store::new();
        ingest(&sample_gml(), &IngestOptions::default(), &mut store).unwrap();
        assert_eq!(store.segments.len(), 1);
        assert_eq!(store.features.len(), 1); // the lake; Tregruppe is avoided
    }

    #[test]
    fn avoided_classes_are_dropped_by_default() {
        let mut store = Store::new();
        ingest(&sample_gml(), &IngestOptions::default(), &mut store).unwrap();
        assert!(store.features.iter().all(|f| f.class != ObjectClass::Tregruppe));
    }

    #[test]
    fn keep_avoided_classes_option_retains_them() {
        let mut store = Store::new();
        ingest(&sample_gml(), &IngestOptions { keep_avoided_classes: true }, &mut store).unwrap();
        assert!(store.features.iter().any(|f| f.class == ObjectClass::Tregruppe));
    }

    #[test]
    fn water_edge_segment_starts_unused() {
        let mut store = Store::new();
        ingest(&sample_gml(), &IngestOptions::default(), &mut store).unwrap();
        assert_eq!(store.segments[0].used, 0);
    }
}

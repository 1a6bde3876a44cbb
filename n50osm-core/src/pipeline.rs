//! drives the full topological reconstruction pipeline (§2) from a raw GML
//! byte stream to an emitted [`emit::OsmDocument`]. the sole owner of the
//! `Store` for the run's duration: each stage below takes `&mut Store` in
//! strict sequence and none overlap, so there is never a need to reason
//! about two stages touching the arena at once.

use std::collections::BTreeSet;

use crate::classify::{self, ClassifierTables};
use crate::coalesce;
use crate::decompose;
use crate::elevation::{self, ElevationSource, LAKE_ELE_AREA_M2};
use crate::emit::{self, OsmDocument};
use crate::enrichment::{lakes, names};
use crate::error::N50Error;
use crate::geo::primitives::ISLAND_AREA_M2;
use crate::index::SegmentIndex;
use crate::ingest::{self, IngestOptions};
use crate::islands;
use crate::model::lake::LakeRecord;
use crate::model::place::PlaceRecord;
use crate::store::Store;

/// toggles threaded through a single run, one per CLI flag (§6).
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// `--debug`: carry unreferenced segments and `extras` into the output.
    pub debug: bool,
    /// `--tag`: additionally copy every remaining raw GML attribute as `N50_<key>`.
    pub tag_raw_attributes: bool,
    /// `!--nonode`: run the Node Coalescer's stream/boundary intersection pass.
    pub detect_intersections: bool,
    /// `--stream`: reverse uphill-pointing streams.
    pub reverse_streams: bool,
    /// `--ele`: tag lake elevations.
    pub lake_elevations: bool,
    /// `!--noname`: run SSR place-name enrichment.
    pub enrich_names: bool,
    /// `!--nonve`: run the NVE lake overlay.
    pub enrich_lakes: bool,
    /// minimum `|area|` (m²) for `place=island` rather than `place=islet` (§4.4).
    /// overridable via `RunConfig` (§3); defaults to [`ISLAND_AREA_M2`].
    pub island_area_m2: f64,
    /// minimum lake area (m²) sampled for elevation when it has no known
    /// name anchor (§4.6). overridable via `RunConfig`; defaults to
    /// [`LAKE_ELE_AREA_M2`].
    pub lake_elevation_area_m2: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            debug: false,
            tag_raw_attributes: false,
            detect_intersections: true,
            reverse_streams: false,
            lake_elevations: false,
            enrich_names: true,
            enrich_lakes: true,
            island_area_m2: ISLAND_AREA_M2,
            lake_elevation_area_m2: LAKE_ELE_AREA_M2,
        }
    }
}

pub struct PipelineResult {
    pub document: OsmDocument,
    /// object classes encountered that carried no static/override tag set (§7 class 5).
    pub missing_tags: BTreeSet<String>,
    /// features dropped at Ingest for being malformed or unroutable.
    pub dropped_features: usize,
}

/// runs Ingest through Emit over one municipality/category GML extract.
/// `places`/`lakes_data` are the already-fetched SSR/NVE records (empty when
/// their corresponding flag disables enrichment); `elevation_source` must be
/// `Some` whenever `options.reverse_streams || options.lake_elevations`.
pub fn run(
    gml_bytes: &[u8],
    options: &PipelineOptions,
    tables: &ClassifierTables,
    places: &[PlaceRecord],
    lakes_data: &[LakeRecord],
    mut elevation_source: Option<&mut dyn ElevationSource>,
) -> Result<PipelineResult, N50Error> {
    let mut store = Store::new();

    log::info!("ingest: decoding GML feature stream");
    let dropped_features = ingest::ingest(gml_bytes, &IngestOptions::default(), &mut store)?;

    log::info!("classify: mapping feature/segment classes to OSM tags");
    let missing_tags = classify::classify_all(&mut store, tables);
    if options.tag_raw_attributes {
        classify::tag_raw_attributes(&mut store);
    }

    log::info!("decompose: building the segment index and decomposing polygon rings");
    let index = SegmentIndex::build(&store);
    decompose::decompose_all(&mut store, &index);

    log::info!("islands: detecting islands and deleting sea faces");
    islands::detect_islands(&mut store, options.island_area_m2);

    log::info!("coalesce: merging coincident stream/boundary nodes");
    let shared = coalesce::coalesce(&mut store, options.detect_intersections);

    if options.reverse_streams || options.lake_elevations {
        let source = elevation_source
            .as_mut()
            .ok_or_else(|| N50Error::Internal("elevation pass requested but no elevation source was provided".to_string()))?;
        if options.reverse_streams {
            log::info!("elevation: reversing uphill-pointing streams");
            elevation::reverse_streams(&mut store, *source)?;
        }
        if options.lake_elevations {
            log::info!("elevation: tagging lake elevations");
            elevation::tag_lake_elevations(&mut store, *source, places, options.debug, options.lake_elevation_area_m2)?;
        }
    }

    if options.enrich_lakes {
        log::info!("enrichment: overlaying NVE lake attributes");
        lakes::enrich_lakes(&mut store, lakes_data);
    }
    if options.enrich_names {
        log::info!("enrichment: attaching SSR place names");
        names::enrich_names(&mut store, places, &names::default_categories());
    }

    log::info!("emit: assigning provisional identifiers and flattening ways/relations");
    let document = emit::emit(&mut store, &shared, options.debug);

    Ok(PipelineResult { document, missing_tags, dropped_features })
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
                            <gml:posList>
                                597000 6643000 597200 6643000 597200 6643200 597000 6643200 597000 6643000
                            </gml:posList>
                        </gml:LineStringSegment></gml:segments></gml:Curve>
                    </app:grense>
                </app:Innsjøkant>
            </gml:featureMember>
        </gml:FeatureCollection>"#
            .to_vec()
    }

    #[test]
    fn runs_end_to_end_over_a_minimal_lake() {
        let options = PipelineOptions::default();
        let tables = ClassifierTables::default();
        let result = run(&sample_gml(), &options, &tables, &[], &[], None).unwrap();
        assert_eq!(result.dropped_features, 0);
        assert_eq!(result.document.ways.len(), 1);
        assert_eq!(result.document.ways[0].tags.get("water"), Some("lake"));
    }

    #[test]
    fn missing_elevation_source_is_an_error_when_stream_reversal_is_requested() {
        let mut options = PipelineOptions::default();
        options.reverse_streams = true;
        let tables = ClassifierTables::default();
        let result = run(&sample_gml(), &options, &tables, &[], &[], None);
        assert!(result.is_err());
    }
}

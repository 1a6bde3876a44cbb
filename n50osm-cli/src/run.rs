//! drives one end-to-end invocation (§6): resolve the municipality and
//! category, fetch every external collaborator's bytes, hand them to
//! `n50osm-core`, and write the result. This is the only module that knows
//! about HTTP, the filesystem, or argument parsing — everything downstream
//! of fetching is the core crate's pure, already-tested pipeline.

use std::fs;
use std::time::Duration;

use n50osm_core::classify::building_types::parse_building_type_table;
use n50osm_core::classify::ClassifierTables;
use n50osm_core::ingest::{self, IngestOptions};
use n50osm_core::pipeline::{self, PipelineOptions};
use n50osm_core::store::Store;
use n50osm_core::N50Error;

use crate::app::N50OsmArgs;
use crate::categories;
use crate::client::{building_types, elevation::HttpElevationSource, gml, municipality, nve, ssr};
use crate::config::RunConfig;
use crate::output;

pub fn run(args: N50OsmArgs) -> Result<(), N50Error> {
    let config = RunConfig::load(args.config.as_deref())?;
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| N50Error::Internal(format!("building HTTP client: {e}")))?;

    let category = categories::resolve(&args.category)?;
    let place = municipality::lookup(&client, &config.municipality_base_url, &args.municipality)?;
    log::info!("municipality: {} {}", place.id, place.name);
    log::info!("category: {category}");

    let gml_bytes = gml::fetch_gml(&client, &config.n50_base_url, &place.id, &place.name, category)?;

    let output_stem = format!("n50_{}_{}_{}", place.id, place.name.replace(' ', "_"), category);

    if args.geojson {
        let mut store = Store::new();
        let dropped = ingest::ingest(&gml_bytes, &IngestOptions { keep_avoided_classes: true }, &mut store)?;
        log::info!("ingested {} features, {} segments ({dropped} dropped)", store.features.len(), store.segments.len());
        let bytes = output::write_geojson(&store.features, &store.segments)?;
        let filename = format!("{output_stem}.geojson");
        fs::write(&filename, bytes)?;
        log::info!("wrote {filename}");
        return Ok(());
    }

    let mut tables = ClassifierTables::default();
    if category == "BygningerOgAnlegg" {
        let csv_bytes = building_types::fetch(&client, &config.building_types_url)?;
        tables.building_types = parse_building_type_table(&csv_bytes)?;
    }

    let places = if args.noname {
        Vec::new()
    } else {
        ssr::fetch_places(&client, &config.ssr_base_url, &place.id)?
    };
    let lakes = if args.nonve {
        Vec::new()
    } else {
        nve::fetch_lakes(&client, &config.nve_base_url, &place.id)?
    };

    let options = PipelineOptions {
        debug: args.debug,
        tag_raw_attributes: args.tag,
        detect_intersections: !args.nonode,
        reverse_streams: args.stream,
        lake_elevations: args.ele,
        enrich_names: !args.noname,
        enrich_lakes: !args.nonve,
        island_area_m2: config.island_area_m2,
        lake_elevation_area_m2: config.lake_elevation_area_m2,
    };

    let mut elevation_source = if options.reverse_streams || options.lake_elevations {
        Some(HttpElevationSource::new(&client, &config.elevation_base_url, config.elevation_retry_attempts, config.elevation_retry_base_secs))
    } else {
        None
    };

    let result = pipeline::run(
        &gml_bytes,
        &options,
        &tables,
        &places,
        &lakes,
        elevation_source.as_mut().map(|s| s as &mut dyn n50osm_core::elevation::ElevationSource),
    )?;

    if !result.missing_tags.is_empty() {
        log::warn!("unclassified object classes: {}", result.missing_tags.into_iter().collect::<Vec<_>>().join(", "));
    }
    if result.dropped_features > 0 {
        log::warn!("dropped {} malformed/unroutable feature(s) during ingest", result.dropped_features);
    }

    let bytes = output::write_osm_xml(&result.document)?;
    let filename = format!("{output_stem}.osm");
    fs::write(&filename, bytes)?;
    log::info!(
        "wrote {filename} ({} nodes, {} ways, {} relations)",
        result.document.nodes.len(),
        result.document.ways.len(),
        result.document.relations.len()
    );
    Ok(())
}

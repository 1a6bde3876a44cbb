use std::path::PathBuf;

use clap::Parser;

/// converts one Norwegian municipality's N50 topographic GML data, for a
/// single thematic category, into topologically-reconstructed OSM XML
/// (§6). a single flat operation: this tool has exactly one thing to do
/// per invocation.
#[derive(Debug, Parser)]
#[command(name = "n50osm", about = "Convert N50 GML data for one Norwegian municipality into OSM-format output", version)]
pub struct N50OsmArgs {
    /// four-digit municipality number, or a name/substring to look up.
    pub municipality: String,

    /// thematic category, prefix-matched against the known N50 categories
    /// (AdministrativeOmrader, Arealdekke, BygningerOgAnlegg, Hoyde,
    /// Restriksjonsomrader, Samferdsel, Stedsnavn).
    pub category: String,

    /// carry unreferenced segments and raw `extras` into the output as
    /// uppercase debug tags.
    #[arg(long)]
    pub debug: bool,

    /// additionally copy every remaining raw GML attribute onto its
    /// feature/segment as `N50_<key>`.
    #[arg(long)]
    pub tag: bool,

    /// write raw GeoJSON instead of running the reconstruction pipeline.
    #[arg(long)]
    pub geojson: bool,

    /// reverse uphill-pointing streams using sampled elevation data.
    #[arg(long)]
    pub stream: bool,

    /// tag lakes with their sampled elevation.
    #[arg(long)]
    pub ele: bool,

    /// skip SSR place-name enrichment.
    #[arg(long)]
    pub noname: bool,

    /// skip the NVE lake-attribute overlay.
    #[arg(long)]
    pub nonve: bool,

    /// skip the Node Coalescer's stream/boundary intersection pass.
    #[arg(long)]
    pub nonode: bool,

    /// path to a TOML configuration file overriding the default service
    /// URLs and thresholds (§3).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

use std::path::Path;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use n50osm_core::N50Error;

/// ambient run configuration (§3): service base URLs and the handful of
/// numeric thresholds a user might reasonably want to override without
/// touching code. loaded from an optional TOML file and left at its
/// built-in defaults for any key the file omits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub municipality_base_url: String,
    pub n50_base_url: String,
    pub building_types_url: String,
    pub ssr_base_url: String,
    pub nve_base_url: String,
    pub elevation_base_url: String,
    pub elevation_retry_attempts: u32,
    pub elevation_retry_base_secs: u64,
    /// minimum `|area|` (m²) for `place=island` rather than `place=islet` (§4.4).
    pub island_area_m2: f64,
    /// minimum lake area (m²) sampled for elevation absent a known name anchor (§4.6).
    pub lake_elevation_area_m2: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            municipality_base_url: "https://ws.geonorge.no".to_string(),
            n50_base_url: "https://nedlasting.geonorge.no".to_string(),
            building_types_url: "https://register.geonorge.no/data/bygningstyper.csv".to_string(),
            ssr_base_url: "https://ssr2.geonorge.no".to_string(),
            nve_base_url: "https://gis3.nve.no/map/rest/services".to_string(),
            elevation_base_url: "https://ws.geonorge.no".to_string(),
            elevation_retry_attempts: 5,
            elevation_retry_base_secs: 1,
            island_area_m2: n50osm_core::geo::primitives::ISLAND_AREA_M2,
            lake_elevation_area_m2: n50osm_core::elevation::LAKE_ELE_AREA_M2,
        }
    }
}

impl RunConfig {
    /// loads the file at `path`, if given, overlaid on [`RunConfig::default`].
    /// an absent `path` yields the defaults untouched (§3: "the config file
    /// is optional; every key has a built-in default").
    pub fn load(path: Option<&Path>) -> Result<Self, N50Error> {
        let Some(path) = path else {
            return Ok(RunConfig::default());
        };
        let builder = Config::builder().add_source(File::from(path));
        let built = builder.build().map_err(|e| N50Error::Config(format!("file '{}' produced error: {e}", path.display())))?;
        built.try_deserialize::<RunConfig>().map_err(|e| N50Error::Config(format!("file '{}' did not match the expected configuration shape: {e}", path.display())))
    }
}

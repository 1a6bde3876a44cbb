//! Topological reconstruction pipeline that turns a flat pool of N50 GML
//! features into a coherent OSM-shaped graph: shared nodes, oriented
//! coastline/water boundaries, classified islands, and enriched tags.
//!
//! The crate is deliberately free of any HTTP client: every external
//! collaborator (municipality/category lookup, GML/SSR/NVE/elevation
//! fetches, OSM XML serialisation) lives in `n50osm-cli` and is handed to
//! this crate either as plain bytes (`ingest`) or as data already decoded
//! into [`model::place::PlaceRecord`] / [`model::lake::LakeRecord`] / an
//! [`elevation::ElevationSource`] implementation.

pub mod classify;
pub mod coalesce;
pub mod decompose;
pub mod elevation;
pub mod emit;
pub mod enrichment;
pub mod error;
pub mod geo;
pub mod index;
pub mod ingest;
pub mod islands;
pub mod model;
pub mod pipeline;
pub mod store;

pub use error::N50Error;
pub use pipeline::{run, PipelineOptions, PipelineResult};
pub use store::Store;

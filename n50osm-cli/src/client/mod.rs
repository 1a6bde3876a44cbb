pub mod building_types;
pub mod elevation;
pub mod gml;
pub mod municipality;
pub mod nve;
pub mod ssr;

use n50osm_core::N50Error;

fn transport_err(e: reqwest::Error) -> N50Error {
    N50Error::Transport(e.to_string())
}

use n50osm_core::N50Error;

use super::transport_err;

/// fetches the building sub-code CSV (§4.2, §6) as raw bytes; parsing is
/// `n50osm_core::classify::building_types::parse_building_type_table`'s job.
pub fn fetch(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, N50Error> {
    let resp = client.get(url).send().map_err(transport_err)?;
    if !resp.status().is_success() {
        return Err(N50Error::Transport(format!("GET {url} returned {}", resp.status())));
    }
    Ok(resp.bytes().map_err(transport_err)?.to_vec())
}

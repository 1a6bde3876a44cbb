use std::thread;
use std::time::Duration;

use serde::Deserialize;

use n50osm_core::elevation::ElevationSource;
use n50osm_core::model::node::Node;
use n50osm_core::N50Error;

use super::transport_err;

#[derive(Debug, Deserialize)]
struct PunktResponse {
    #[serde(default)]
    punkter: Vec<Punkt>,
}

#[derive(Debug, Deserialize)]
struct Punkt {
    z: Option<f64>,
}

/// the elevations service's real HTTP collaborator (§6): one point per
/// request, retried with exponential backoff (§5 — the only service this
/// spec singles out for retry, since it is the slowest and most throttled).
pub struct HttpElevationSource<'a> {
    client: &'a reqwest::blocking::Client,
    base_url: String,
    max_attempts: u32,
    base_delay_secs: u64,
}

impl<'a> HttpElevationSource<'a> {
    pub fn new(client: &'a reqwest::blocking::Client, base_url: impl Into<String>, max_attempts: u32, base_delay_secs: u64) -> Self {
        HttpElevationSource { client, base_url: base_url.into(), max_attempts, base_delay_secs }
    }

    fn fetch_once(&self, node: Node) -> Result<f64, N50Error> {
        let url = format!("{}/hoydedata/v1/punkt?nord={}&ost={}&geojson=false&koordsys=4258", self.base_url, node.lat(), node.lon());
        let resp = self.client.get(&url).send().map_err(transport_err)?;
        if !resp.status().is_success() {
            return Err(N50Error::Transport(format!("GET {url} returned {}", resp.status())));
        }
        let parsed: PunktResponse = resp.json().map_err(transport_err)?;
        parsed
            .punkter
            .first()
            .and_then(|p| p.z)
            .ok_or_else(|| N50Error::Transport(format!("elevation response for {node} carried no z value")))
    }
}

impl<'a> ElevationSource for HttpElevationSource<'a> {
    /// §5: "retry with exponential backoff (1, 2, 4, 8, 16 seconds, up to 5
    /// attempts) applies to elevation sampling only". `base_delay_secs`
    /// defaults to 1 so the sequence is exactly that; a config override
    /// scales every step uniformly.
    fn sample(&mut self, node: Node) -> Result<f64, N50Error> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(node) {
                Ok(ele) => return Ok(ele),
                Err(e) if attempt < self.max_attempts => {
                    let delay = self.base_delay_secs * (1u64 << (attempt - 1));
                    log::warn!("elevation lookup for {node} failed ({e}); retrying in {delay}s (attempt {attempt}/{})", self.max_attempts);
                    thread::sleep(Duration::from_secs(delay));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_delay_doubles_each_attempt() {
        let delays: Vec<u64> = (1..=5).map(|attempt| 1u64 * (1u64 << (attempt - 1))).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16]);
    }
}

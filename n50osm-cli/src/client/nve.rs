use kdam::{Bar, BarExt};
use serde::Deserialize;

use n50osm_core::model::lake::LakeRecord;
use n50osm_core::N50Error;

use super::transport_err;

const PAGE_SIZE: u32 = 1000;

#[derive(Debug, Deserialize)]
struct NveAttributes {
    #[serde(rename = "vatnLnr")]
    vatn_lnr: Option<i64>,
    navn: Option<String>,
    hoyde: Option<f64>,
    #[serde(rename = "arealKm2")]
    areal_km2: Option<f64>,
    #[serde(rename = "magasinNr")]
    magasin_nr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NveFeature {
    attributes: NveAttributes,
}

#[derive(Debug, Deserialize)]
struct NveResponse {
    #[serde(default)]
    features: Vec<NveFeature>,
    #[serde(default, rename = "exceededTransferLimit")]
    exceeded_transfer_limit: bool,
}

/// pages through NVE's lake database query service for one municipality
/// (§6), following `resultOffset`/`exceededTransferLimit` until the service
/// reports the page is the last one.
pub fn fetch_lakes(client: &reqwest::blocking::Client, base_url: &str, municipality_id: &str) -> Result<Vec<LakeRecord>, N50Error> {
    let mut out = Vec::new();
    let mut offset = 0u32;
    let mut bar = Bar::builder().desc("fetching NVE lake records").build().map_err(|e| N50Error::Internal(format!("error building progress bar: {e}")))?;

    loop {
        let url = format!(
            "{base_url}/Innsjodatabase2/MapServer/5/query?where=kommNr%3D%27{municipality_id}%27&outFields=*&f=json&resultOffset={offset}&resultRecordCount={PAGE_SIZE}"
        );
        let resp = client.get(&url).send().map_err(transport_err)?;
        if !resp.status().is_success() {
            return Err(N50Error::Transport(format!("GET {url} returned {}", resp.status())));
        }
        let parsed: NveResponse = resp.json().map_err(transport_err)?;
        let got = parsed.features.len();

        for feature in parsed.features {
            let Some(vatn_lnr) = feature.attributes.vatn_lnr else { continue };
            out.push(LakeRecord {
                nve_ref: vatn_lnr.to_string(),
                name: feature.attributes.navn,
                ele: feature.attributes.hoyde,
                area_km2: feature.attributes.areal_km2.unwrap_or(0.0),
                magazine_id: feature.attributes.magasin_nr,
            });
            let _ = bar.update(1);
        }

        if !parsed.exceeded_transfer_limit || got == 0 {
            break;
        }
        offset += PAGE_SIZE;
    }
    eprintln!();
    Ok(out)
}

use serde::Deserialize;

use n50osm_core::N50Error;

use super::transport_err;

#[derive(Debug, Clone)]
pub struct Municipality {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct KommuneInfo {
    kommunenummer: String,
    #[serde(rename = "kommunenavnNorsk")]
    kommunenavn_norsk: String,
}

#[derive(Debug, Deserialize)]
struct KommuneSearchResult {
    #[serde(default)]
    kommuner: Vec<KommuneInfo>,
}

fn is_kommunenummer(query: &str) -> bool {
    query.len() == 4 && query.chars().all(|c| c.is_ascii_digit())
}

/// resolves a municipality number or name/substring against geonorge's
/// `kommuneinfo` service (§6). an ambiguous name query is reported with
/// every matching name so the user can narrow it down.
pub fn lookup(client: &reqwest::blocking::Client, base_url: &str, query: &str) -> Result<Municipality, N50Error> {
    if is_kommunenummer(query) {
        let url = format!("{base_url}/kommuneinfo/v1/kommuner/{query}");
        let resp = client.get(&url).send().map_err(transport_err)?;
        if !resp.status().is_success() {
            return Err(N50Error::MunicipalityNotFound(query.to_string()));
        }
        let info: KommuneInfo = resp.json().map_err(transport_err)?;
        return Ok(Municipality { id: info.kommunenummer, name: info.kommunenavn_norsk });
    }

    let url = format!("{base_url}/kommuneinfo/v1/sok?knavn={query}");
    let resp = client.get(&url).send().map_err(transport_err)?;
    let result: KommuneSearchResult = resp.json().map_err(transport_err)?;
    match result.kommuner.as_slice() {
        [only] => Ok(Municipality { id: only.kommunenummer.clone(), name: only.kommunenavn_norsk.clone() }),
        [] => Err(N50Error::MunicipalityNotFound(query.to_string())),
        many => Err(N50Error::MunicipalityAmbiguous {
            query: query.to_string(),
            matches: many.iter().map(|k| k.kommunenavn_norsk.clone()).collect(),
        }),
    }
}

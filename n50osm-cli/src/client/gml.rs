use std::io::{Cursor, Read};

use n50osm_core::N50Error;

use super::transport_err;

/// transliterates a municipality name into the ASCII form geonorge's
/// download filenames use: upper-cased, Æ/Ø/Å folded, spaces replaced with
/// underscores (§6).
pub fn transliterate_name(name: &str) -> String {
    name.to_uppercase().replace('Æ', "E").replace('Ø', "O").replace('Å', "A").replace(' ', "_")
}

fn zip_err(e: zip::result::ZipError) -> N50Error {
    N50Error::Zip(e.to_string())
}

/// downloads the municipality's N50 zip archive for `category` and returns
/// the decoded bytes of its inner `.gml` member (§1, §6). the outer archive
/// is always named for the generic "Kartdata" product; only the inner
/// member's filename substitutes the chosen category.
pub fn fetch_gml(client: &reqwest::blocking::Client, base_url: &str, id: &str, name: &str, category: &str) -> Result<Vec<u8>, N50Error> {
    let translit = transliterate_name(name);
    let zip_url = format!("{base_url}/Basisdata/N50Kartdata/GML/Basisdata_{id}_{translit}_25833_N50Kartdata_GML.zip");

    let resp = client.get(&zip_url).send().map_err(transport_err)?;
    if !resp.status().is_success() {
        return Err(N50Error::Transport(format!("GET {zip_url} returned {}", resp.status())));
    }
    let bytes = resp.bytes().map_err(transport_err)?;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).map_err(zip_err)?;
    let inner_name = format!("Basisdata_{id}_{translit}_25833_N50{category}.gml");

    let mut idx = None;
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(zip_err)?;
        if entry.name().ends_with(&inner_name) {
            idx = Some(i);
            break;
        }
    }
    let idx = idx.ok_or_else(|| N50Error::Zip(format!("no archive member matching '{inner_name}'")))?;

    let mut entry = archive.by_index(idx).map_err(zip_err)?;
    let mut gml_bytes = Vec::new();
    entry.read_to_end(&mut gml_bytes)?;
    Ok(gml_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_norwegian_letters_and_spaces() {
        assert_eq!(transliterate_name("Ålesund"), "ALESUND");
        assert_eq!(transliterate_name("Nord-Fron"), "NORD-FRON");
        assert_eq!(transliterate_name("Øvre Eiker"), "OVRE_EIKER");
    }
}

use std::collections::HashMap;

use crate::error::N50Error;
use crate::model::tags::Tags;

/// the building sub-code table (§4.2, §6): a two-column CSV, `id -> name=value+name=value…`.
/// fetching the CSV bytes from its published URL is the CLI's job; this
/// only parses bytes already in hand, so the core crate never needs an HTTP
/// client of its own.
pub fn parse_building_type_table(csv_bytes: &[u8]) -> Result<HashMap<String, Tags>, N50Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .from_reader(csv_bytes);

    let mut table = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let Some(id) = record.get(0) else { continue };
        let Some(tag_column) = record.get(2) else { continue };
        let mut tags = Tags::new();
        let extra_column = record.get(3).unwrap_or("");
        let combined = format!("{tag_column}+{extra_column}");
        for item in combined.split('+') {
            if let Some((key, value)) = item.split_once('=') {
                if !key.is_empty() {
                    tags.set(key.trim(), value.trim());
                }
            }
        }
        if !tags.is_empty() {
            table.insert(id.trim().to_string(), tags);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plus_joined_tag_columns() {
        let csv = b"id;name;building_tag;extra_tag;description\n\
                    111;Enebolig;building=house;;detached house\n\
                    181;Hytte;building=cabin+leisure=resort;;holiday cabin\n";
        let table = parse_building_type_table(csv).unwrap();
        assert_eq!(table.get("111").unwrap().get("building"), Some("house"));
        let hytte = table.get("181").unwrap();
        assert_eq!(hytte.get("building"), Some("cabin"));
        assert_eq!(hytte.get("leisure"), Some("resort"));
    }

    #[test]
    fn plus_joined_extra_column_keeps_both_pairs() {
        let csv = b"id;name;building_tag;extra_tag;description\n\
                    222;Driftsbygning;building=farm_auxiliary;a=b+c=d;farm outbuilding\n";
        let table = parse_building_type_table(csv).unwrap();
        let t = table.get("222").unwrap();
        assert_eq!(t.get("building"), Some("farm_auxiliary"));
        assert_eq!(t.get("a"), Some("b"));
        assert_eq!(t.get("c"), Some("d"));
    }
}

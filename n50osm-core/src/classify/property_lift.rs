use crate::model::class::ObjectClass;
use crate::model::feature::Feature;
use crate::model::tags::Tags;

/// precedence level 3 (§4.2): lifts a handful of well-known GML attribute
/// leaves straight onto the tag set, regardless of which override or static
/// entry produced the rest of it.
pub fn lift_properties(feature: &Feature, tags: &mut Tags) {
    if let Some(ele) = feature.extras.get("høyde") {
        tags.set("ele", ele.clone());
    }
    if let Some(min_ele) = feature.extras.get("lavesteRegulerteVannstand") {
        tags.set("ele:min", min_ele.clone());
    }
    if let Some(nve_ref) = feature.extras.get("vatnLøpenummer") {
        tags.set("ref:nve:vann", nve_ref.clone());
    }
    if let Some(name) = feature.extras.get("navn") {
        tags.set("name", name.clone());
    }
    if let Some(name) = feature.extras.get("fulltekst") {
        tags.set("name", name.clone());
    }
    if let Some(sted) = feature.extras.get("stedsnummer") {
        tags.set("ssr:stedsnr", sted.clone());
    }
    if let Some(merking) = feature.extras.get("merking") {
        if merking == "JA" {
            tags.set("trailblazed", "yes");
        }
    }
    if let Some(verneform) = feature.extras.get("verneform") {
        match verneform.as_str() {
            "NP" | "NPS" => tags.set("boundary", "national_park"),
            "LVO" | "NM" => {
                tags.set("leisure", "nature_reserve");
                tags.set("protect_class", "5");
            }
            _ => tags.set("leisure", "nature_reserve"),
        }
    }
    if feature.class == ObjectClass::Hoppbakke {
        if let Some(lengde) = feature.extras.get("lengde") {
            tags.set("ref", format!("K{lengde}"));
        }
    }
}

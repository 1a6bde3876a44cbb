use crate::model::class::ObjectClass;
use crate::model::tags::Tags;

/// the static class → OSM tag-set dictionary (§4.2 precedence level 2).
/// classes with their own override function (§4.2 level 1) are intentionally
/// absent here; `classify_feature` consults the override before falling
/// back to this table.
pub fn static_tags(class: &ObjectClass) -> Tags {
    let mut t = Tags::new();
    match class {
        ObjectClass::Kystkontur => t.set("natural", "coastline"),

        ObjectClass::Havflate => {} // deleted before emit; no representation of its own
        ObjectClass::Innsjø => {
            t.set("natural", "water");
        }
        ObjectClass::InnsjøRegulert => {
            t.set("natural", "water");
            t.set("water", "reservoir");
        }
        ObjectClass::FerskvannTørrfall => {
            t.set("natural", "water");
            t.set("intermittent", "yes");
        }
        ObjectClass::Øy => {} // place=island|islet is set by the island detector itself

        ObjectClass::Skytefelt => {
            t.set("landuse", "military");
            t.set("military", "range");
        }
        ObjectClass::Alpinbakke => t.set("piste:type", "downhill"),
        ObjectClass::BymessigBebyggelse => t.set("landuse", "residential"),
        ObjectClass::DyrketMark => t.set("landuse", "farmland"),
        ObjectClass::Foss => t.set("waterway", "waterfall"),
        ObjectClass::Golfbane => t.set("leisure", "golf_course"),
        ObjectClass::Gravplass => t.set("landuse", "cemetery"),
        ObjectClass::Hyttefelt => {
            t.set("landuse", "residential");
            t.set("building", "cabin");
        }
        ObjectClass::Industriområde => t.set("landuse", "industrial"),
        ObjectClass::Myr => {
            t.set("natural", "wetland");
            t.set("wetland", "bog");
        }
        ObjectClass::Park => t.set("leisure", "park"),
        ObjectClass::Rullebane => t.set("aeroway", "runway"),
        ObjectClass::Skjær => t.set("natural", "bare_rock"),
        ObjectClass::Skog => t.set("natural", "wood"),
        ObjectClass::SnøIsbre => t.set("natural", "glacier"),
        ObjectClass::Steinbrudd => t.set("landuse", "quarry"),
        ObjectClass::Steintipp => t.set("man_made", "spoil_heap"),
        ObjectClass::Tettbebyggelse => t.set("landuse", "residential"),
        ObjectClass::Barmarksløype => t.set("highway", "track"),
        ObjectClass::Traktorveg => {
            t.set("highway", "track");
            t.set("motor_vehicle", "agricultural");
        }
        ObjectClass::Sti => t.set("highway", "path"),
        ObjectClass::TrigonometriskPunkt => t.set("man_made", "survey_point"),
        ObjectClass::Naturvernområde => t.set("boundary", "protected_area"),
        ObjectClass::Allmenning => t.set("landuse", "meadow"),
        ObjectClass::Campingplass => t.set("tourism", "camp_site"),
        ObjectClass::Dam => t.set("waterway", "dam"),
        ObjectClass::Flytebrygge => {
            t.set("man_made", "pier");
            t.set("floating", "yes");
        }
        ObjectClass::Gruve => t.set("man_made", "mineshaft"),
        ObjectClass::Hoppbakke => {
            t.set("leisure", "pitch");
            t.set("sport", "ski_jumping");
        }
        ObjectClass::KaiBrygge => t.set("man_made", "pier"),
        ObjectClass::Ledning => t.set("power", "line"),
        ObjectClass::LuftledningLH => t.set("power", "line"),
        ObjectClass::Lysløype => {
            t.set("highway", "path");
            t.set("sport", "skiing");
            t.set("lit", "yes");
        }
        ObjectClass::MastTele => {
            t.set("man_made", "mast");
            t.set("tower:type", "communication");
        }
        ObjectClass::Molo => t.set("man_made", "breakwater"),
        ObjectClass::Navigasjonsinstallasjon => t.set("man_made", "beacon"),
        ObjectClass::Parkeringsområde => t.set("amenity", "parking"),
        ObjectClass::Pir => t.set("man_made", "pier"),
        ObjectClass::Reingjerde => t.set("barrier", "fence"),
        ObjectClass::Rørgate => t.set("man_made", "pipeline"),
        ObjectClass::Skitrekk => t.set("aerialway", "drag_lift"),
        ObjectClass::Skytebaneinnretning => {
            t.set("leisure", "pitch");
            t.set("sport", "shooting");
        }
        ObjectClass::Tank => t.set("man_made", "storage_tank"),
        ObjectClass::Taubane => t.set("aerialway", "cable_car"),
        ObjectClass::Tårn => t.set("man_made", "tower"),
        ObjectClass::Vindkraftverk => {
            t.set("power", "generator");
            t.set("generator:source", "wind");
        }

        // boundary/auxiliary segment classes carry no tags of their own;
        // the polygon they bound is what gets tagged.
        ObjectClass::HavElvSperre
        | ObjectClass::HavInnsjøSperre
        | ObjectClass::Innsjøkant
        | ObjectClass::InnsjøkantRegulert
        | ObjectClass::ElvBekkKant
        | ObjectClass::InnsjøInnsjøSperre
        | ObjectClass::InnsjøElvSperre
        | ObjectClass::FerskvannTørrfallkant
        | ObjectClass::FiktivDelelinje
        | ObjectClass::KantUtsnitt
        | ObjectClass::Arealbrukgrense
        | ObjectClass::Dataavgrensning
        | ObjectClass::Terrengpunkt => {}

        // ElvBekk, Bygning, Lufthavn, SportIdrettPlass go through overrides.
        // everything else (unknown/unmapped classes) falls through empty and
        // is reported via `missing_tags`.
        _ => {}
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lake_gets_water_tag_but_not_lake_subtype() {
        let t = static_tags(&ObjectClass::Innsjø);
        assert_eq!(t.get("natural"), Some("water"));
        assert_eq!(t.get("water"), None);
    }

    #[test]
    fn sea_face_gets_no_tags() {
        assert!(static_tags(&ObjectClass::Havflate).is_empty());
    }
}

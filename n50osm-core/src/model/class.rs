use std::fmt::Display;
use std::str::FromStr;

/// the N50 object-class vocabulary. this is deliberately *not* exhaustive of
/// every class the dataset can contain — classes that never affect control
/// flow (ordinary point-of-interest symbols, unrelated line types) fall
/// through to `Other`, exactly as `Highway::Other` absorbs any tag string
/// the enum does not special-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectClass {
    // --- boundary / segment classes (geometry kind `grense`) ---
    Kystkontur,
    HavElvSperre,
    HavInnsjøSperre,
    Innsjøkant,
    InnsjøkantRegulert,
    ElvBekkKant,
    InnsjøInnsjøSperre,
    InnsjøElvSperre,
    FerskvannTørrfallkant,
    FiktivDelelinje,
    /// fabricated by border fabrication (§4.3); never present in source GML.
    KantUtsnitt,
    Arealbrukgrense,
    Dataavgrensning,

    // --- water-body polygon classes ---
    Havflate,
    Innsjø,
    InnsjøRegulert,
    ElvBekk,
    FerskvannTørrfall,
    /// synthesised by island detection (§4.4); never present in source GML.
    Øy,

    // --- land-cover / structure / poi classes with special handling ---
    Bygning,
    Lufthavn,
    SportIdrettPlass,
    Skytefelt,

    // --- static-tag-table classes (non-exhaustive representative set) ---
    Alpinbakke,
    BymessigBebyggelse,
    DyrketMark,
    Foss,
    Golfbane,
    Gravplass,
    Hyttefelt,
    Industriområde,
    Myr,
    Park,
    Rullebane,
    Skjær,
    Skog,
    SnøIsbre,
    Steinbrudd,
    Steintipp,
    Tettbebyggelse,
    Barmarksløype,
    Traktorveg,
    Sti,
    Terrengpunkt,
    TrigonometriskPunkt,
    Naturvernområde,
    Allmenning,
    Campingplass,
    Dam,
    Flytebrygge,
    Gruve,
    Hoppbakke,
    KaiBrygge,
    Ledning,
    LuftledningLH,
    Lysløype,
    MastTele,
    Molo,
    Navigasjonsinstallasjon,
    Parkeringsområde,
    Pir,
    Reingjerde,
    Rørgate,
    Skitrekk,
    Skytebaneinnretning,
    Tank,
    Taubane,
    Tårn,
    Vindkraftverk,

    // --- classes dropped unless raw mode is requested ---
    ÅpentOmråde,
    Tregruppe,
    GangSykkelveg,
    VegSenterlinje,
    Vegsperring,
    Forsenkningskurve,
    Hjelpekurve,
    Høydekurve,
    PresentasjonTekst,

    Other(String),
}

impl ObjectClass {
    /// classes whose features are dropped at ingest unless raw-geojson mode
    /// is active (§4.1).
    pub fn is_avoided(&self) -> bool {
        matches!(
            self,
            ObjectClass::ÅpentOmråde
                | ObjectClass::Tregruppe
                | ObjectClass::GangSykkelveg
                | ObjectClass::VegSenterlinje
                | ObjectClass::Vegsperring
                | ObjectClass::Forsenkningskurve
                | ObjectClass::Hjelpekurve
                | ObjectClass::Høydekurve
                | ObjectClass::PresentasjonTekst
        )
    }

    /// classes that participate in decomposition/coalescing but never get an
    /// OSM representation of their own.
    pub fn is_auxiliary(&self) -> bool {
        matches!(
            self,
            ObjectClass::Arealbrukgrense
                | ObjectClass::Dataavgrensning
                | ObjectClass::FiktivDelelinje
                | ObjectClass::InnsjøElvSperre
                | ObjectClass::InnsjøInnsjøSperre
                | ObjectClass::ElvBekkKant
                | ObjectClass::Havflate
                | ObjectClass::Innsjøkant
                | ObjectClass::InnsjøkantRegulert
                | ObjectClass::FerskvannTørrfallkant
        )
    }

    /// water-body feature classes (lake, reservoir, river, sea, intermittent
    /// water) as referenced throughout §4.3/§4.4.
    pub fn is_water_body(&self) -> bool {
        matches!(
            self,
            ObjectClass::Havflate
                | ObjectClass::Innsjø
                | ObjectClass::InnsjøRegulert
                | ObjectClass::ElvBekk
                | ObjectClass::FerskvannTørrfall
        )
    }

    pub fn is_sea(&self) -> bool {
        matches!(self, ObjectClass::Havflate)
    }

    /// segment classes inherently referenceable by construction (`used = 1`
    /// at ingest, per §4.1): coastline and sea-separator edges.
    pub fn is_inherently_used(&self) -> bool {
        matches!(
            self,
            ObjectClass::Kystkontur | ObjectClass::HavElvSperre | ObjectClass::HavInnsjøSperre
        )
    }

    pub fn is_coastline(&self) -> bool {
        matches!(self, ObjectClass::Kystkontur)
    }

    /// sea-lake or sea-river separator segments.
    pub fn is_sea_separator(&self) -> bool {
        matches!(self, ObjectClass::HavElvSperre | ObjectClass::HavInnsjøSperre)
    }

    /// segment classes that bound a water body (lake, reservoir, river edge).
    pub fn is_water_edge(&self) -> bool {
        matches!(
            self,
            ObjectClass::Innsjøkant
                | ObjectClass::InnsjøkantRegulert
                | ObjectClass::ElvBekkKant
                | ObjectClass::InnsjøInnsjøSperre
                | ObjectClass::InnsjøElvSperre
        )
    }

    /// segments covering an intermittently-dry edge; not a land boundary
    /// for island-detection purposes (§4.4 Phase A).
    pub fn is_intermittent_edge(&self) -> bool {
        matches!(self, ObjectClass::FerskvannTørrfallkant)
    }

    /// any segment class that can bound a water body's sea-vs-land interface
    /// (coastline, sea separators, or water edges) — used by Phase B's
    /// candidate filter.
    pub fn is_coastline_like(&self) -> bool {
        self.is_coastline() || self.is_sea_separator() || self.is_water_edge()
    }
}

impl Display for ObjectClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectClass::Other(s) => write!(f, "{s}"),
            other => write!(f, "{:?}", other),
        }
    }
}

impl FromStr for ObjectClass {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Kystkontur" => ObjectClass::Kystkontur,
            "HavElvSperre" => ObjectClass::HavElvSperre,
            "HavInnsjøSperre" => ObjectClass::HavInnsjøSperre,
            "Innsjøkant" => ObjectClass::Innsjøkant,
            "InnsjøkantRegulert" => ObjectClass::InnsjøkantRegulert,
            "ElvBekkKant" => ObjectClass::ElvBekkKant,
            "InnsjøInnsjøSperre" => ObjectClass::InnsjøInnsjøSperre,
            "InnsjøElvSperre" => ObjectClass::InnsjøElvSperre,
            "FerskvannTørrfallkant" => ObjectClass::FerskvannTørrfallkant,
            "FiktivDelelinje" => ObjectClass::FiktivDelelinje,
            "KantUtsnitt" => ObjectClass::KantUtsnitt,
            "Arealbrukgrense" => ObjectClass::Arealbrukgrense,
            "Dataavgrensning" => ObjectClass::Dataavgrensning,
            "Havflate" => ObjectClass::Havflate,
            "Innsjø" => ObjectClass::Innsjø,
            "InnsjøRegulert" => ObjectClass::InnsjøRegulert,
            "ElvBekk" => ObjectClass::ElvBekk,
            "FerskvannTørrfall" => ObjectClass::FerskvannTørrfall,
            "Øy" => ObjectClass::Øy,
            "Bygning" => ObjectClass::Bygning,
            "Lufthavn" => ObjectClass::Lufthavn,
            "SportIdrettPlass" => ObjectClass::SportIdrettPlass,
            "Skytefelt" => ObjectClass::Skytefelt,
            "Alpinbakke" => ObjectClass::Alpinbakke,
            "BymessigBebyggelse" => ObjectClass::BymessigBebyggelse,
            "DyrketMark" => ObjectClass::DyrketMark,
            "Foss" => ObjectClass::Foss,
            "Golfbane" => ObjectClass::Golfbane,
            "Gravplass" => ObjectClass::Gravplass,
            "Hyttefelt" => ObjectClass::Hyttefelt,
            "Industriområde" => ObjectClass::Industriområde,
            "Myr" => ObjectClass::Myr,
            "Park" => ObjectClass::Park,
            "Rullebane" => ObjectClass::Rullebane,
            "Skjær" => ObjectClass::Skjær,
            "Skog" => ObjectClass::Skog,
            "SnøIsbre" => ObjectClass::SnøIsbre,
            "Steinbrudd" => ObjectClass::Steinbrudd,
            "Steintipp" => ObjectClass::Steintipp,
            "Tettbebyggelse" => ObjectClass::Tettbebyggelse,
            "Barmarksløype" => ObjectClass::Barmarksløype,
            "Traktorveg" => ObjectClass::Traktorveg,
            "Sti" => ObjectClass::Sti,
            "Terrengpunkt" => ObjectClass::Terrengpunkt,
            "TrigonometriskPunkt" => ObjectClass::TrigonometriskPunkt,
            "Naturvernområde" => ObjectClass::Naturvernområde,
            "Allmenning" => ObjectClass::Allmenning,
            "Campingplass" => ObjectClass::Campingplass,
            "Dam" => ObjectClass::Dam,
            "Flytebrygge" => ObjectClass::Flytebrygge,
            "Gruve" => ObjectClass::Gruve,
            "Hoppbakke" => ObjectClass::Hoppbakke,
            "KaiBrygge" => ObjectClass::KaiBrygge,
            "Ledning" => ObjectClass::Ledning,
            "LuftledningLH" => ObjectClass::LuftledningLH,
            "Lysløype" => ObjectClass::Lysløype,
            "MastTele" => ObjectClass::MastTele,
            "Molo" => ObjectClass::Molo,
            "Navigasjonsinstallasjon" => ObjectClass::Navigasjonsinstallasjon,
            "Parkeringsområde" => ObjectClass::Parkeringsområde,
            "Pir" => ObjectClass::Pir,
            "Reingjerde" => ObjectClass::Reingjerde,
            "Rørgate" => ObjectClass::Rørgate,
            "Skitrekk" => ObjectClass::Skitrekk,
            "Skytebaneinnretning" => ObjectClass::Skytebaneinnretning,
            "Tank" => ObjectClass::Tank,
            "Taubane" => ObjectClass::Taubane,
            "Tårn" => ObjectClass::Tårn,
            "Vindkraftverk" => ObjectClass::Vindkraftverk,
            "ÅpentOmråde" => ObjectClass::ÅpentOmråde,
            "Tregruppe" => ObjectClass::Tregruppe,
            "GangSykkelveg" => ObjectClass::GangSykkelveg,
            "VegSenterlinje" => ObjectClass::VegSenterlinje,
            "Vegsperring" => ObjectClass::Vegsperring,
            "Forsenkningskurve" => ObjectClass::Forsenkningskurve,
            "Hjelpekurve" => ObjectClass::Hjelpekurve,
            "Høydekurve" => ObjectClass::Høydekurve,
            "PresentasjonTekst" => ObjectClass::PresentasjonTekst,
            other => ObjectClass::Other(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognised_class_falls_through_to_other() {
        let c: ObjectClass = "NoenUkjentKlasse".parse().unwrap();
        assert_eq!(c, ObjectClass::Other("NoenUkjentKlasse".to_string()));
    }

    #[test]
    fn round_trips_through_display_for_known_classes() {
        let c: ObjectClass = "Innsjø".parse().unwrap();
        assert_eq!(c, ObjectClass::Innsjø);
        assert!(c.is_water_body());
    }

    #[test]
    fn sea_separators_are_coastline_like_but_not_coastline() {
        let c = ObjectClass::HavInnsjøSperre;
        assert!(c.is_coastline_like());
        assert!(!c.is_coastline());
    }
}

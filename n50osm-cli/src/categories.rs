use n50osm_core::N50Error;

/// the seven thematic N50 categories a municipality extract can be
/// requested under (§6).
pub const CATEGORIES: &[&str] =
    &["AdministrativeOmrader", "Arealdekke", "BygningerOgAnlegg", "Hoyde", "Restriksjonsomrader", "Samferdsel", "Stedsnavn"];

/// resolves a user-provided prefix against [`CATEGORIES`], case-insensitively.
pub fn resolve(prefix: &str) -> Result<&'static str, N50Error> {
    let lower = prefix.to_lowercase();
    let matches: Vec<&'static str> = CATEGORIES.iter().copied().filter(|c| c.to_lowercase().starts_with(&lower)).collect();
    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(N50Error::UnknownCategory(prefix.to_string())),
        many => Err(N50Error::UnknownCategory(format!("'{prefix}' matches more than one category: {}", many.join(", ")))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unambiguous_prefix_resolves() {
        assert_eq!(resolve("Areal").unwrap(), "Arealdekke");
    }

    #[test]
    fn unknown_prefix_errors() {
        assert!(resolve("Zzz").is_err());
    }
}

use thiserror::Error;

/// the single error type threaded through fallible core operations.
///
/// geometry anomalies, missing orientation information, and missing
/// classifications are *not* represented here: those are non-fatal by
/// design and are reported through `log::warn!` at their point of
/// occurrence, not propagated as `Err`.
#[derive(Error, Debug)]
pub enum N50Error {
    #[error("municipality not found: {0}")]
    MunicipalityNotFound(String),

    #[error("municipality query '{query}' is ambiguous, matched: {}", matches.join(", "))]
    MunicipalityAmbiguous { query: String, matches: Vec<String> },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("csv error: {0}")]
    Csv(String),

    #[error("zip archive error: {0}")]
    Zip(String),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl From<csv::Error> for N50Error {
    fn from(e: csv::Error) -> Self {
        N50Error::Csv(e.to_string())
    }
}

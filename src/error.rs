use thiserror::Error;

use crate::datetext::DateError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Invalid {criterion} filter: {reason}")]
    InvalidFilter { criterion: String, reason: FilterFault },
    #[error("Mutation not permitted: {0}")]
    DisallowedMutation(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("I/O error: {0}")]
    Io(String),
}

/// Why a single filter criterion was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterFault {
    #[error("{0}")]
    Date(#[from] DateError),
    #[error("must be a (list of) string(s)")]
    NotStrings,
    #[error("must be a mapping of filter names to values")]
    NotAMapping,
    #[error("must be a boolean")]
    NotBoolean,
    #[error("unknown filter")]
    Unknown,
}

impl CatalogError {
    pub fn invalid_filter(criterion: impl Into<String>, reason: impl Into<FilterFault>) -> Self {
        Self::InvalidFilter { criterion: criterion.into(), reason: reason.into() }
    }
    /// The criterion named by an `InvalidFilter`, if this is one.
    pub fn criterion(&self) -> Option<&str> {
        match self {
            Self::InvalidFilter { criterion, .. } => Some(criterion),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

// Helper conversions
impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}
impl From<config::ConfigError> for CatalogError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self { Self::Json(e.to_string()) }
}
impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}

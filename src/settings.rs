use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::store::PersistenceMode;

/// Runtime settings, read from an optional settings file and `PUBCATALOG_*`
/// environment variables (the latter win).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_database")]
    pub database_file_and_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database() -> String {
    "pubcatalog.db".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self { database_file_and_path: default_database(), log_level: default_log_level() }
    }
}

impl Settings {
    /// Loads settings from `path` (format picked by extension, e.g. `pubcatalog.json`).
    /// A missing file is not an error; defaults apply.
    pub fn load(path: &str) -> Result<Settings> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("PUBCATALOG"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
    pub fn persistence_mode(&self) -> PersistenceMode {
        PersistenceMode::from_path(&self.database_file_and_path)
    }
}

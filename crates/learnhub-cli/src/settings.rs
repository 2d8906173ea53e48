//! CLI settings
//!
//! Layered lowest to highest: built-in defaults, `learnhub.toml` in the
//! working directory (optional), `LEARNHUB_*` environment variables. The
//! `--db` flag overrides the database path on top of all of them.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use learnhub_core::logging_facility::Profile;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "learnhub.toml";

const DEFAULT_DATABASE_PATH: &str = ".learnhub/learnhub.db";
const DEFAULT_LOG_PROFILE: &str = "production";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_path: PathBuf,
    pub log_profile: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(config_file: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("log_profile", DEFAULT_LOG_PROFILE)?
            .add_source(File::from(config_file).required(false))
            .add_source(Environment::with_prefix("LEARNHUB"))
            .build()?
            .try_deserialize()
    }

    pub fn profile(&self) -> Result<Profile, String> {
        self.log_profile.parse()
    }
}

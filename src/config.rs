//! Optional TOML configuration.
//!
//! ```toml
//! dataset = "data/insurance.csv"
//! artifact = "models/rf_tuned.bin"
//!
//! [forest]
//! n_estimators = 200
//! max_depth = 12
//! max_features = "sqrt"
//! ```
//!
//! Every key is optional. TOML has no null, so an unbounded `max_depth`
//! can only be requested by building a [`ForestConfig`] in code.

use crate::artifact::DEFAULT_ARTIFACT_PATH;
use crate::error::ConfigError;
use crate::model::ForestConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default training data location.
pub const DEFAULT_DATASET_PATH: &str = "insurance.csv";
/// File picked up by [`AppConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "medcost.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: PathBuf,
    pub artifact: PathBuf,
    pub forest: ForestConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET_PATH),
            artifact: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            forest: ForestConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read the file at `path`. A missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `medcost.toml` from `dir` if it exists, defaults otherwise.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            log::debug!("no {} found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// `explicit` if given, otherwise [`AppConfig::discover`] in the working directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::discover("."),
        }
    }
}

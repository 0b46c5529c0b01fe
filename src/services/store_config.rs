use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::services::file_store::FileScenarioStore;
use crate::services::kv_store::KvScenarioStore;
use crate::services::scenario_store::{ScenarioStore, StoreError};

pub const DEFAULT_CONFIG_FILE: &str = "fleetcalc.yaml";
pub const DEFAULT_DATA_DIR: &str = "data/scenarios";

pub const BACKEND_ENV: &str = "FLEETCALC_STORE_BACKEND";
pub const DATA_DIR_ENV: &str = "FLEETCALC_DATA_DIR";
pub const KV_URL_ENV: &str = "KV_REST_API_URL";
pub const KV_TOKEN_ENV: &str = "KV_REST_API_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("unknown store backend: {0} (expected file or kv)")]
    UnknownBackend(String),
    #[error("key-value store selected but {0} is not set")]
    MissingKvSetting(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    File,
    Kv,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "kv" => Ok(StoreBackend::Kv),
            _ => Err(ConfigError::UnknownBackend(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    pub kv_url: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            kv_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub store: StoreSettings,
}

/// Environment values that override the config file.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub backend: Option<String>,
    pub data_dir: Option<String>,
    pub kv_url: Option<String>,
    pub kv_token: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|value| !value.trim().is_empty());
        Self {
            backend: read(BACKEND_ENV),
            data_dir: read(DATA_DIR_ENV),
            kv_url: read(KV_URL_ENV),
            kv_token: read(KV_TOKEN_ENV),
        }
    }
}

impl CalculatorConfig {
    pub fn from_yaml_str(input: &str, origin: &Path) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, or defaults when the file does not exist.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents, path)
    }

    pub fn apply_overrides(mut self, overrides: &EnvOverrides) -> Result<Self, ConfigError> {
        if let Some(backend) = &overrides.backend {
            self.store.backend = StoreBackend::parse(backend)?;
        }
        if let Some(data_dir) = &overrides.data_dir {
            self.store.data_dir = PathBuf::from(data_dir);
        }
        if let Some(kv_url) = &overrides.kv_url {
            self.store.kv_url = Some(kv_url.clone());
        }
        Ok(self)
    }
}

/// Loads the config file and applies environment overrides.
pub fn load_config(path: Option<&str>) -> Result<(CalculatorConfig, EnvOverrides), ConfigError> {
    let overrides = EnvOverrides::from_env();
    let config = CalculatorConfig::from_yaml_file(path.unwrap_or(DEFAULT_CONFIG_FILE))?
        .apply_overrides(&overrides)?;
    Ok((config, overrides))
}

/// Builds the configured store backend.
pub fn open_store(
    config: &CalculatorConfig,
    overrides: &EnvOverrides,
) -> Result<Box<dyn ScenarioStore>, ConfigError> {
    match config.store.backend {
        StoreBackend::File => Ok(Box::new(FileScenarioStore::new(
            config.store.data_dir.clone(),
        ))),
        StoreBackend::Kv => {
            let url = config
                .store
                .kv_url
                .as_deref()
                .ok_or(ConfigError::MissingKvSetting(KV_URL_ENV))?;
            let token = overrides
                .kv_token
                .as_deref()
                .ok_or(ConfigError::MissingKvSetting(KV_TOKEN_ENV))?;
            Ok(Box::new(KvScenarioStore::new(url, token)?))
        }
    }
}

/// `load_config` followed by `open_store`.
pub fn open_configured_store(path: Option<&str>) -> Result<Box<dyn ScenarioStore>, ConfigError> {
    let (config, overrides) = load_config(path)?;
    debug!(backend = ?config.store.backend, "opening scenario store");
    open_store(&config, &overrides)
}

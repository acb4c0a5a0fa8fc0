use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::csv::DEFAULT_HEADERS;
use crate::domain::error::{AppError, Result};
use crate::domain::question::DEFAULT_PART_NUMBER;

pub const DEFAULT_CONFIG_FILE: &str = "exam-importer.toml";
pub const CONFIG_PATH_ENV: &str = "EXAM_IMPORTER_CONFIG";
pub const ENV_PREFIX: &str = "EXAM_IMPORTER_";

/// Importer service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImporterConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub import: ImportSettings,

    pub registry: RegistryConfig,

    #[validate(nested)]
    pub storage: StorageConfig,

    /// tracing-subscriber filter directive, e.g. "info" or "exam_importer_lib=debug"
    #[validate(length(min = 1))]
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportSettings {
    /// Required header names, one per column slot in standard order
    #[validate(length(equal = 7))]
    pub expected_headers: Vec<String>,

    /// Part number used when a request does not name one
    #[validate(range(min = 1))]
    pub default_part_number: u32,

    /// Section used when a row leaves the Section cell blank
    #[validate(length(min = 1))]
    pub default_section: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Extra free-text labels mapped to canonical question types
    #[serde(default)]
    pub extra_aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    pub sqlite_path: PathBuf,

    #[validate(nested)]
    pub http: HttpStorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HttpStorageConfig {
    /// Content API root, e.g. "https://content.example.com/api"
    #[validate(url)]
    pub base_url: Option<String>,

    pub api_key: Option<String>,

    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            import: ImportSettings {
                expected_headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
                default_part_number: DEFAULT_PART_NUMBER,
                default_section: "Reading".to_string(),
            },
            registry: RegistryConfig::default(),
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                sqlite_path: PathBuf::from("data/questions.db"),
                http: HttpStorageConfig {
                    base_url: None,
                    api_key: None,
                    timeout_secs: 30,
                },
            },
            log_filter: "info".to_string(),
        }
    }
}

impl ImporterConfig {
    /// Load `.env`, then defaults, the TOML file and `EXAM_IMPORTER_*` variables
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load from a specific TOML file (missing files are skipped) plus environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load configuration: {}", e)))?;
        config.check()?;
        Ok(config)
    }

    /// Field rules plus the cross-field ones derive rules cannot express
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid configuration: {}", e)))?;

        if self.storage.backend == StorageBackend::Http && self.storage.http.base_url.is_none() {
            return Err(AppError::ConfigError(
                "storage.http.base_url is required when storage.backend = \"http\"".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

//! Server configuration.
//!
//! Layers, lowest priority first: built-in defaults, optional YAML file,
//! `MOVIES_*` environment variables, then the legacy `DATABASE_URL`.

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use movies_core::{default_log_level, CatalogLimits, PoolConfig};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "MOVIES_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "movies.yaml";
const ENV_PREFIX: &str = "MOVIES_";
const LEGACY_DATABASE_ENV: &str = "DATABASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// SQLite file; a `sqlite://` or `sqlite:` prefix is accepted.
    pub database_path: String,
    pub pool_size: usize,
    pub busy_timeout_ms: u64,
    pub top_movies_limit: u32,
    pub random_movies_count: u32,
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let pool = PoolConfig::default();
        let limits = CatalogLimits::default();
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_path: "movies.db".to_string(),
            pool_size: pool.size,
            busy_timeout_ms: u64::try_from(pool.busy_timeout.as_millis()).unwrap_or(u64::MAX),
            top_movies_limit: limits.top_movies,
            random_movies_count: limits.random_movies,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Load(Box<figment::Error>),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(err) => Some(err.as_ref()),
            Self::Invalid(_) => None,
        }
    }
}

impl ServerConfig {
    /// Loads the layered config, reading the YAML file named by
    /// `MOVIES_CONFIG` (or `movies.yaml` when unset and present).
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_figment(Self::figment(&file))
    }

    /// Full provider stack over `config_file`. A missing file is skipped.
    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
            .merge(
                Env::raw()
                    .only(&[LEGACY_DATABASE_ENV])
                    .map(|_| "database_path".into()),
            )
    }

    /// Extracts and validates a config from any provider stack.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .extract()
            .map_err(|err| ConfigError::Load(Box::new(err)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.database_file().as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database_path cannot be empty".to_string()));
        }
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid("pool_size must be at least 1".to_string()));
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr.parse().map_err(|err| {
            ConfigError::Invalid(format!("bind_addr `{}` is not a socket address: {err}", self.bind_addr))
        })
    }

    /// Database file path with any `sqlite:` scheme removed.
    pub fn database_file(&self) -> PathBuf {
        let raw = self.database_path.trim();
        let path = raw
            .strip_prefix("sqlite://")
            .or_else(|| raw.strip_prefix("sqlite:"))
            .unwrap_or(raw);
        PathBuf::from(path)
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            size: self.pool_size,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }

    pub fn catalog_limits(&self) -> CatalogLimits {
        CatalogLimits {
            top_movies: self.top_movies_limit,
            random_movies: self.random_movies_count,
        }
    }
}

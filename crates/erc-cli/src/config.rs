//! TOML configuration for storage aliases and the runtime environment.
//!
//! ```toml
//! environment = "development"
//!
//! [databases.erc]
//! url = "sqlite://data/erc.db"
//! busy_timeout_ms = 5000
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use erc_model::{ErcError, Result};
use erc_storage::{ConnectionDescriptor, StorageRegistry};

pub const DEFAULT_CONFIG_FILE: &str = "erc.toml";
pub const DEFAULT_ALIAS: &str = "erc";
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ErcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(ErcError::invalid_config(format!(
                "unknown environment '{other}' (expected development or production)"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// One `[databases.<alias>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

impl DatabaseConfig {
    pub fn descriptor(&self) -> Result<ConnectionDescriptor> {
        let descriptor = ConnectionDescriptor::parse(&self.url)?;
        Ok(match self.busy_timeout_ms {
            Some(ms) => descriptor.with_busy_timeout(Duration::from_millis(ms)),
            None => descriptor,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseConfig>,
}

impl Default for AppConfig {
    /// A single `erc` alias backed by `erc.db` in the working directory.
    fn default() -> Self {
        let mut databases = BTreeMap::new();
        databases.insert(
            DEFAULT_ALIAS.to_string(),
            DatabaseConfig {
                url: "erc.db".to_string(),
                busy_timeout_ms: None,
            },
        );
        Self {
            environment: Environment::default(),
            databases,
        }
    }
}

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|err| ErcError::invalid_config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|err| {
            ErcError::invalid_config(format!("read {}: {err}", path.display()))
        })?;
        let config = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), aliases = config.databases.len(), "loaded configuration");
        Ok(config)
    }

    /// Resolves the configuration used by the CLI: an explicit path must
    /// exist, otherwise `erc.toml` is used when present and the built-in
    /// default when not. `APP_ENV` is applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.with_environment_override(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
    }

    /// Replaces `environment` when an override value is present.
    pub fn with_environment_override(mut self, value: Option<&str>) -> Result<Self> {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.environment = value.parse()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.databases.is_empty() {
            return Err(ErcError::invalid_config("no databases configured"));
        }
        for (alias, database) in &self.databases {
            database.descriptor().map_err(|err| match err {
                ErcError::InvalidConfig { reason } => {
                    ErcError::invalid_config(format!("databases.{alias}: {reason}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Registers every configured alias.
    pub fn register_all(&self, registry: &StorageRegistry) -> Result<()> {
        for (alias, database) in &self.databases {
            registry.register(alias, database.descriptor()?)?;
        }
        info!(
            environment = %self.environment,
            aliases = self.databases.len(),
            "storage registry ready"
        );
        Ok(())
    }
}

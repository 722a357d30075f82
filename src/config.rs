//! Service configuration
//!
//! Values come from an optional TOML file and are then overridden by
//! environment variables. The targeted semester is a deploy-time literal: the
//! store does hold enough data to guess the latest semester, but early preview
//! data makes that guess wrong, so it is configured instead of derived.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};

/// Semester served when nothing else is configured
pub const DEFAULT_SEMESTER: &str = "FA2021";

/// Label of the semester whose sections are assembled, e.g. `FA2021`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Semester(String);

impl Semester {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Semester {
    fn default() -> Self {
        Self::new(DEFAULT_SEMESTER)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub semester: Semester,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Relational store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(with = "humantime_serde", default = "default_acquire_timeout")]
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout: default_acquire_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl CatalogConfig {
    /// Load from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> CatalogResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_env_vars()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> CatalogResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn merge_env_vars(&mut self) -> CatalogResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CatalogResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DB_URL") {
            self.database.url = Some(url);
        }

        if let Some(semester) = lookup("CATALOG_SEMESTER") {
            self.semester = Semester::new(semester);
        }

        if let Some(bind) = lookup("CATALOG_BIND") {
            self.server.bind = bind;
        }

        if let Some(max) = lookup("CATALOG_MAX_CONNECTIONS") {
            self.database.max_connections = max.parse().map_err(|_| {
                CatalogError::configuration(format!(
                    "CATALOG_MAX_CONNECTIONS must be a positive integer, got {max:?}"
                ))
            })?;
        }

        Ok(())
    }

    /// Connection string, required when serving from Postgres
    pub fn database_url(&self) -> CatalogResult<&str> {
        self.database
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                CatalogError::configuration("no database url configured (set DB_URL)")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.semester.as_str(), "FA2021");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(30));
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(config.database_url().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = CatalogConfig::from_toml(
            r#"
            semester = "SP2022"

            [database]
            url = "postgres://localhost/catalog"
            acquire_timeout = "5s"

            [server]
            bind = "127.0.0.1:3000"
            "#,
        )
        .unwrap();

        assert_eq!(config.semester, Semester::new("SP2022"));
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/catalog");
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(5));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = CatalogConfig::from_toml("semester = ").unwrap_err();
        assert!(matches!(err, CatalogError::Toml(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = CatalogConfig::from_toml("semester = \"SP2022\"").unwrap();
        config
            .apply_overrides(lookup(&[
                ("DB_URL", "postgres://db/catalog"),
                ("CATALOG_SEMESTER", "FA2022"),
                ("CATALOG_MAX_CONNECTIONS", "12"),
            ]))
            .unwrap();

        assert_eq!(config.semester.as_str(), "FA2022");
        assert_eq!(config.database_url().unwrap(), "postgres://db/catalog");
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_max_connections_override() {
        let mut config = CatalogConfig::default();
        let err = config
            .apply_overrides(lookup(&[("CATALOG_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("CATALOG_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_empty_database_url_is_missing() {
        let mut config = CatalogConfig::default();
        config.apply_overrides(lookup(&[("DB_URL", "")])).unwrap();
        assert!(config.database_url().is_err());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, "[server]\nbind = \"127.0.0.1:9999\"\n").unwrap();

        let config = CatalogConfig::from_file(&path).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9999");
    }
}

//! Configuration loading and management.
//!
//! Settings come from a YAML file, then environment variables, then CLI flags,
//! each tier overriding the one before it.
//!
//! ## Environment Variables
//! - `TASK_MANAGER_CONFIG_PATH` - Explicit config file
//! - `TASK_MANAGER_DB_PATH` - Database path
//! - `TASK_MANAGER_HOST` - Listen address
//! - `TASK_MANAGER_PORT` - Listen port

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "task-manager.yaml";

/// Service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address to listen on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("task-manager.db")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Resolve the configuration for this process.
    ///
    /// An explicit path (argument or `TASK_MANAGER_CONFIG_PATH`) must load.
    /// Otherwise `task-manager.yaml` is used if present, else the defaults.
    /// Environment overrides are applied on top.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os("TASK_MANAGER_CONFIG_PATH").map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `TASK_MANAGER_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("TASK_MANAGER_DB_PATH") {
            self.server.db_path = PathBuf::from(db_path);
        }

        if let Some(host) = lookup("TASK_MANAGER_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("TASK_MANAGER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "Ignoring invalid TASK_MANAGER_PORT"),
            }
        }
    }

    /// Socket address built from `host` and `port`.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .with_context(|| format!("invalid listen address {}", addr))
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.server.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.db_path, PathBuf::from("task-manager.db"));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.listen_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("server:\n  port: 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.db_path, PathBuf::from("task-manager.db"));
    }

    #[test]
    fn empty_mapping_is_default() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("TASK_MANAGER_DB_PATH", "/tmp/tasks.db"),
            ("TASK_MANAGER_HOST", "0.0.0.0"),
            ("TASK_MANAGER_PORT", "9000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::from_yaml("server:\n  port: 8080\n").unwrap();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.db_path, PathBuf::from("/tmp/tasks.db"));
        assert_eq!(config.listen_addr().unwrap().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn invalid_env_port_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == "TASK_MANAGER_PORT").then(|| "nope".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task-manager.yaml");
        std::fs::write(&path, "server:\n  db_path: data/tasks.db\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.db_path, PathBuf::from("data/tasks.db"));
    }

    #[test]
    fn ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.db_path = dir.path().join("nested/deeper/tasks.db");

        config.ensure_db_dir().unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
    }
}

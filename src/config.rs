use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Path of an optional JSON config file
pub const CONFIG_FILE_ENV: &str = "HEALTH_RISK_CONFIG";
/// Overrides `server.host`
pub const HOST_ENV: &str = "HEALTH_RISK_HOST";
/// Overrides `server.port`
pub const PORT_ENV: &str = "HEALTH_RISK_PORT";
/// Overrides `model.path`
pub const MODEL_ENV: &str = "HEALTH_RISK_MODEL";
/// Set to `1` by the hosting platform for production deployments
pub const DEPLOYMENT_ENV: &str = "REPLIT_DEPLOYMENT";

/// Main configuration for the prediction service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Model artifact configuration
    pub model: ModelConfig,

    /// Deployment mode, always taken from the environment
    #[serde(skip)]
    pub mode: DeploymentMode,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Number of worker threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: num_cpus::get(),
        }
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized classifier
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("global_model.json"),
        }
    }
}

/// Development runs under a file watcher that restarts the process on
/// change; production runs once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    #[default]
    Development,
    Production,
}

impl DeploymentMode {
    /// Mode for a value of [`DEPLOYMENT_ENV`]
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("1") => DeploymentMode::Production,
            _ => DeploymentMode::Development,
        }
    }

    pub fn from_env() -> Self {
        Self::from_flag(std::env::var(DEPLOYMENT_ENV).ok().as_deref())
    }

    pub fn auto_reload(self) -> bool {
        self == DeploymentMode::Development
    }

    /// Log filter used when `RUST_LOG` is unset
    pub fn default_log_filter(self) -> &'static str {
        match self {
            DeploymentMode::Development => "debug",
            DeploymentMode::Production => "info",
        }
    }

    /// Seconds workers get to finish in-flight requests on shutdown
    pub fn shutdown_timeout_secs(self) -> u64 {
        if self.auto_reload() {
            0
        } else {
            30
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Defaults, then the optional config file, then environment overrides
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`Config::load`] with an injectable environment
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_ENV) {
            Some(path) => {
                info!("Loading configuration from {}", path);
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        if config.server.workers == 0 {
            return Err(Error::config("server.workers must be at least 1"));
        }
        config.mode = DeploymentMode::from_flag(lookup(DEPLOYMENT_ENV).as_deref());
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("{} must be a port number, got {:?}", PORT_ENV, port)))?;
        }
        if let Some(path) = lookup(MODEL_ENV) {
            self.model.path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_with(env(&[])).unwrap();
        assert_eq!(config.bind_addr(), ("0.0.0.0".to_string(), 5000));
        assert_eq!(config.model.path, PathBuf::from("global_model.json"));
        assert!(config.server.workers >= 1);
        assert_eq!(config.mode, DeploymentMode::Development);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::load_with(env(&[
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "8080"),
            (MODEL_ENV, "/models/risk.bin"),
            (DEPLOYMENT_ENV, "1"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), ("127.0.0.1".to_string(), 8080));
        assert_eq!(config.model.path, PathBuf::from("/models/risk.bin"));
        assert_eq!(config.mode, DeploymentMode::Production);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = Config::load_with(env(&[(PORT_ENV, "fifty")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.kind(), ErrorKind::Startup);
    }

    #[test]
    fn test_zero_workers_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file_config = Config::default();
        file_config.server.workers = 0;
        file_config.to_file(&path).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let err = Config::load_with(env(&[(CONFIG_FILE_ENV, path_str.as_str())])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.kind(), ErrorKind::Startup);
    }

    #[test]
    fn test_config_file_then_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file_config = Config::default();
        file_config.server.port = 9000;
        file_config.model.path = PathBuf::from("from_file.json");
        file_config.to_file(&path).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = Config::load_with(env(&[
            (CONFIG_FILE_ENV, path_str.as_str()),
            (MODEL_ENV, "from_env.json"),
        ]))
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.model.path, PathBuf::from("from_env.json"));
    }

    #[test]
    fn test_deployment_flag() {
        assert_eq!(DeploymentMode::from_flag(Some("1")), DeploymentMode::Production);
        assert_eq!(DeploymentMode::from_flag(Some("0")), DeploymentMode::Development);
        assert_eq!(DeploymentMode::from_flag(None), DeploymentMode::Development);
        assert!(DeploymentMode::Development.auto_reload());
        assert!(!DeploymentMode::Production.auto_reload());
        assert_eq!(DeploymentMode::Production.default_log_filter(), "info");
    }
}

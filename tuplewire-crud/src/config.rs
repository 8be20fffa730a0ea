//! Default crud options.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values (every option unset)
//! 2. YAML config file (if specified via TUPLEWIRE_CONFIG)
//! 3. Environment variables

use crate::count::CountOpts;
use crate::error::ConfigError;
use crate::len::LenOpts;
use crate::options::Mode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options applied to every crud request unless the caller overrides them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudConfig {
    /// Call timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vshard_router: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_replica: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullscan: Option<bool>,
}

fn parse_bool(value: &str) -> bool {
    value == "1" || value.to_lowercase() == "true"
}

impl CrudConfig {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("TUPLEWIRE_CONFIG") {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: CrudConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Loads configuration from environment variables only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a variable lookup.
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(timeout) = var("TUPLEWIRE_CRUD_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.timeout = Some(secs);
            }
        }

        if let Some(router) = var("TUPLEWIRE_CRUD_VSHARD_ROUTER") {
            if !router.is_empty() {
                self.vshard_router = Some(router);
            }
        }

        if let Some(mode) = var("TUPLEWIRE_CRUD_MODE") {
            if let Ok(parsed) = mode.parse() {
                self.mode = Some(parsed);
            }
        }

        if let Some(v) = var("TUPLEWIRE_CRUD_PREFER_REPLICA") {
            self.prefer_replica = Some(parse_bool(&v));
        }

        if let Some(v) = var("TUPLEWIRE_CRUD_BALANCE") {
            self.balance = Some(parse_bool(&v));
        }

        if let Some(v) = var("TUPLEWIRE_CRUD_FULLSCAN") {
            self.fullscan = Some(parse_bool(&v));
        }
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Ok(())
    }

    /// Default options for `crud.count`.
    pub fn count_opts(&self) -> CountOpts {
        CountOpts {
            timeout: self.timeout,
            vshard_router: self.vshard_router.clone(),
            mode: self.mode,
            prefer_replica: self.prefer_replica,
            balance: self.balance,
            fullscan: self.fullscan,
            ..Default::default()
        }
    }

    /// Default options for `crud.len`.
    pub fn len_opts(&self) -> LenOpts {
        LenOpts {
            timeout: self.timeout,
            vshard_router: self.vshard_router.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tuplewire_protocol::OptionSet;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CrudConfig::default();
        assert!(config.count_opts().option_map().is_empty());
        assert!(config.len_opts().option_map().is_empty());
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crud.yaml");
        std::fs::write(&path, "timeout: 3\nmode: read\nfullscan: true\n").unwrap();

        let config = CrudConfig::from_file(&path).unwrap();
        assert_eq!(config.timeout, Some(3));
        assert_eq!(config.mode, Some(Mode::Read));
        assert_eq!(config.fullscan, Some(true));
        assert_eq!(config.balance, None);

        let opts = config.count_opts();
        assert_eq!(opts.option_map().names(), vec!["timeout", "mode", "fullscan"]);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crud.yaml");
        let config = CrudConfig {
            timeout: Some(10),
            vshard_router: Some("cold".to_string()),
            balance: Some(false),
            ..Default::default()
        };

        config.save(&path).unwrap();
        let loaded = CrudConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        let yaml = std::fs::read_to_string(&path).unwrap();
        assert!(!yaml.contains("mode"));
    }

    #[test]
    fn test_missing_file() {
        let err = CrudConfig::from_file("/nonexistent/crud.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crud.yaml");
        std::fs::write(&path, "mode: sideways\n").unwrap();

        let err = CrudConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
        assert!(err.to_string().contains("crud.yaml"));
    }

    #[test]
    fn test_overrides() {
        let mut config = CrudConfig {
            timeout: Some(1),
            ..Default::default()
        };
        config.apply_overrides(overrides(&[
            ("TUPLEWIRE_CRUD_TIMEOUT", "7"),
            ("TUPLEWIRE_CRUD_MODE", "write"),
            ("TUPLEWIRE_CRUD_BALANCE", "1"),
            ("TUPLEWIRE_CRUD_PREFER_REPLICA", "no"),
            ("TUPLEWIRE_CRUD_VSHARD_ROUTER", "hot"),
        ]));

        assert_eq!(config.timeout, Some(7));
        assert_eq!(config.mode, Some(Mode::Write));
        assert_eq!(config.balance, Some(true));
        assert_eq!(config.prefer_replica, Some(false));
        assert_eq!(config.vshard_router.as_deref(), Some("hot"));
        assert_eq!(config.fullscan, None);
    }

    #[test]
    fn test_unparseable_overrides_are_ignored() {
        let mut config = CrudConfig {
            timeout: Some(1),
            mode: Some(Mode::Read),
            ..Default::default()
        };
        config.apply_overrides(overrides(&[
            ("TUPLEWIRE_CRUD_TIMEOUT", "soon"),
            ("TUPLEWIRE_CRUD_MODE", "master"),
            ("TUPLEWIRE_CRUD_VSHARD_ROUTER", ""),
        ]));
        assert_eq!(config.timeout, Some(1));
        assert_eq!(config.mode, Some(Mode::Read));
        assert_eq!(config.vshard_router, None);
    }
}

//! Layered configuration: compiled defaults, then a TOML file, then
//! `HELIX_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Project config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "helix.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HelixConfig {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub batch: BatchConfig,
}

/// How to launch the numbering tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Program and leading arguments, e.g. `["docker", "run", "--rm", "anarci", "ANARCI"]`.
    pub command: Vec<String>,
    pub timeout_secs: u64,
    /// Command printing the tool version on stdout.
    pub version_command: Option<Vec<String>>,
    /// Provenance recorded with every result.
    pub source: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            command: vec!["ANARCI".to_string()],
            timeout_secs: 60,
            version_command: None,
            source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(".helix/cache.sqlite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Entries per chunk in batch annotation.
    pub size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { size: 50 }
    }
}

impl HelixConfig {
    /// Resolve the configuration.
    ///
    /// An explicit `path` must exist; otherwise `helix.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let project = Path::new(DEFAULT_CONFIG_FILE);
                if project.exists() {
                    Self::from_file(project)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `HELIX_ANARCI_COMMAND`, `HELIX_CACHE_PATH` and `HELIX_TIMEOUT_SECS`.
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("HELIX_ANARCI_COMMAND") {
            self.provider.command = val.split_whitespace().map(str::to_string).collect();
        }
        if let Some(val) = var("HELIX_CACHE_PATH") {
            self.cache.path = PathBuf::from(val);
        }
        if let Some(val) = var("HELIX_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(v) => self.provider.timeout_secs = v,
                Err(_) => tracing::warn!(value = %val, "ignoring non-numeric HELIX_TIMEOUT_SECS"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.command.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "provider.command".to_string(),
                message: "must name a program".to_string(),
            });
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "provider.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.batch.size == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "batch.size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = HelixConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.command, vec!["ANARCI"]);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HelixConfig::from_toml(
            r#"
            [provider]
            command = ["docker", "run", "--rm", "anarci", "ANARCI"]
            source = "docker://anarci"

            [batch]
            size = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.command.len(), 5);
        assert_eq!(config.provider.timeout_secs, 60);
        assert_eq!(config.batch.size, 10);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = HelixConfig::from_toml("[provider]\ntimeout_secs = 5\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("HELIX_ANARCI_COMMAND", "podman run anarci ANARCI"),
            ("HELIX_CACHE_PATH", "/tmp/helix.sqlite"),
            ("HELIX_TIMEOUT_SECS", "120"),
        ]);
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.provider.command, vec!["podman", "run", "anarci", "ANARCI"]);
        assert_eq!(config.cache.path, PathBuf::from("/tmp/helix.sqlite"));
        assert_eq!(config.provider.timeout_secs, 120);
    }

    #[test]
    fn test_bad_env_timeout_ignored() {
        let mut config = HelixConfig::default();
        config.apply_env_overrides(|k| (k == "HELIX_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.provider.timeout_secs, 60);
    }

    #[test]
    fn test_validation() {
        let mut config = HelixConfig::default();
        config.batch.size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { field, .. }) if field == "batch.size"
        ));

        let mut config = HelixConfig::default();
        config.apply_env_overrides(|k| (k == "HELIX_ANARCI_COMMAND").then(|| "  ".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            HelixConfig::from_toml("[batch]\nsize = \"many\"\n"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[cache]\nenabled = false\n").unwrap();
        let config = HelixConfig::from_file(&path).unwrap();
        assert!(!config.cache.enabled);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            HelixConfig::load(Some(&missing)),
            Err(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = HelixConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(HelixConfig::from_toml(&text).unwrap(), config);
    }
}

//! Layered configuration: defaults → ~/.cabdash/config.json → env → CLI flags

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{CabdashError, Result};

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_URL: &str = "CABDASH_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CABDASH_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the booking backend, without trailing slash
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load defaults, then the config file (if present), then environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Ok(path) => Self::from_file(&path)?.unwrap_or_default(),
            Err(e) => {
                tracing::debug!("no config directory: {}", e);
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Data directory (~/.cabdash)
    pub fn data_dir() -> Result<PathBuf> {
        let home = directories::UserDirs::new()
            .ok_or_else(|| CabdashError::Config("Failed to get home directory".into()))?
            .home_dir()
            .to_path_buf();
        Ok(home.join(".cabdash"))
    }

    /// Get the default config path (~/.cabdash/config.json)
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.json"))
    }

    /// Read a config file. A missing file is not an error.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CabdashError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Some(config))
    }

    /// Overlay environment variables, read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                CabdashError::Config(format!(
                    "{} must be a whole number, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
        }
        Ok(())
    }

    /// Overlay command-line flags
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&mut self) -> Result<()> {
        let url = self.api_url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CabdashError::Config(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        self.api_url = url.to_string();
        if self.timeout_secs == 0 {
            return Err(CabdashError::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:3001");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_from_file_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let result = Config::from_file(&tmp.path().join("config.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_from_file_partial_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"api_url": "https://api.example.com/"}"#).unwrap();

        let config = Config::from_file(&path).unwrap().unwrap();
        assert_eq!(config.api_url, "https://api.example.com/");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_file_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config error"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            api_url: "https://file.example.com".into(),
            timeout_secs: 30,
        };
        config
            .apply_env(env(&[
                (ENV_API_URL, "https://env.example.com"),
                (ENV_TIMEOUT_SECS, "5"),
            ]))
            .unwrap();

        assert_eq!(config.api_url, "https://env.example.com");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let mut config = Config::default();
        config
            .apply_env(env(&[(ENV_API_URL, "  "), (ENV_TIMEOUT_SECS, "")]))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_bad_timeout() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[(ENV_TIMEOUT_SECS, "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_and_trailing_slash_trimmed() {
        let config = Config::default()
            .with_overrides(Some("https://cli.example.com/".into()), Some(3))
            .unwrap();
        assert_eq!(config.api_url, "https://cli.example.com");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = Config::default().with_overrides(Some("ftp://example.com".into()), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = Config::default().with_overrides(None, Some(0));
        assert!(result.is_err());
    }
}

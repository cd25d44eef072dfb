//! Resolver configuration, optionally loaded from a YAML file
//!
//! The user-level file lives at `~/.config/secret-settings/config.yaml` (or
//! the platform equivalent). Every field has a default, so an absent file or
//! an empty document yields `ResolverConfig::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::traits::{ConfigError, ConfigResult};

/// Environment variable holding the settings URI
pub const DEFAULT_URL_ENV_VAR: &str = "DJ_SECRET_SETTINGS_URL";

/// Base URL of the Secret Manager REST API
pub const DEFAULT_GSM_ENDPOINT: &str = "https://secretmanager.googleapis.com/v1";

/// Metadata server path for service account tokens
pub const DEFAULT_METADATA_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts";

/// Environment variable checked for a ready-made OAuth access token
pub const DEFAULT_TOKEN_ENV_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Settings for the resolver and its bundled fetchers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Environment variable read when `load` is given no URI
    pub url_env_var: String,

    /// Google Secret Manager fetcher settings
    pub gsm: GsmConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            url_env_var: DEFAULT_URL_ENV_VAR.to_string(),
            gsm: GsmConfig::default(),
        }
    }
}

/// Settings for the `gsm` fetcher's HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsmConfig {
    /// Secret Manager API base URL
    pub endpoint: String,

    /// Metadata server service-accounts URL, used when no token variable is set
    pub metadata_url: String,

    /// Environment variable holding a bearer token
    pub token_env_var: String,

    /// Request timeout; `None` leaves requests unbounded
    pub timeout_secs: Option<u64>,
}

impl Default for GsmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GSM_ENDPOINT.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            token_env_var: DEFAULT_TOKEN_ENV_VAR.to_string(),
            timeout_secs: None,
        }
    }
}

impl ResolverConfig {
    /// Path of the user-level config file
    pub fn user_path() -> PathBuf {
        // Use XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("secret-settings").join("config.yaml")
    }

    /// Load the user-level config file, or defaults if it does not exist
    pub fn load_user() -> ConfigResult<Self> {
        Self::load_or_default(Self::user_path())
    }

    /// Load from `path`, or defaults if it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Load from a YAML file that must exist
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse a YAML document
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write to a YAML file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Reject values the resolver cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.url_env_var.trim().is_empty() {
            return Err(ConfigError::Invalid("url_env_var must not be empty".to_string()));
        }
        if self.gsm.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("gsm.endpoint must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.url_env_var, "DJ_SECRET_SETTINGS_URL");
        assert_eq!(config.gsm.endpoint, DEFAULT_GSM_ENDPOINT);
        assert_eq!(config.gsm.timeout_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ResolverConfig::from_yaml("gsm:\n  timeout_secs: 5\n").unwrap();
        assert_eq!(config.gsm.timeout_secs, Some(5));
        assert_eq!(config.url_env_var, DEFAULT_URL_ENV_VAR);
        assert_eq!(config.gsm.token_env_var, DEFAULT_TOKEN_ENV_VAR);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ResolverConfig::from_yaml("  \n").unwrap(), ResolverConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            ResolverConfig::from_yaml("gsm: [unclosed"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = ResolverConfig::load_or_default(temp.path().join("missing.yaml")).unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert!(ResolverConfig::from_file(temp.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let mut config = ResolverConfig::default();
        config.url_env_var = "APP_SETTINGS_URL".to_string();
        config.save(&path).unwrap();

        let loaded = ResolverConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_rejects_empty_env_var() {
        let config = ResolverConfig {
            url_env_var: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_user_path() {
        let path = ResolverConfig::user_path();
        assert!(path.ends_with("secret-settings/config.yaml"));
    }
}

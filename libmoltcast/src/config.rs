//! Configuration management for Moltcast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub mint: MintConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON account store
    pub accounts_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub post_url: String,
    pub index_url: String,
    pub register_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintConfig {
    /// Body template for mint posts; a random suffix is appended per post
    pub template: String,
    /// Title prefix for mint posts; a random suffix is appended per post
    pub title_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            accounts_file: "~/.config/moltcast/accounts.json".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            post_url: "https://www.moltbook.com/api/v1/posts".to_string(),
            index_url: "https://mbc20.xyz/api/index-post".to_string(),
            register_url: "https://www.moltbook.com/api/v1/agents/register".to_string(),
        }
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            template: r#"{"p":"mbc-20","op":"mint","tick":"CLAW","amt":"1000"}"#.to_string(),
            title_prefix: "MBC-20 Mint: CLAW".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            api: ApiConfig::default(),
            mint: MintConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing config file yields the built-in defaults.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Resolved path to the account store, tilde-expanded
    pub fn accounts_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.store.accounts_file).to_string())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("MOLTCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("moltcast").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.post_url, "https://www.moltbook.com/api/v1/posts");
        assert_eq!(config.api.index_url, "https://mbc20.xyz/api/index-post");
        assert_eq!(config.mint.title_prefix, "MBC-20 Mint: CLAW");
        assert!(config.store.accounts_file.ends_with("accounts.json"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[store]
accounts_file = "/tmp/accounts.json"

[api]
post_url = "https://example.com/posts"
index_url = "https://example.com/index"
register_url = "https://example.com/register"

[mint]
template = "mint me"
title_prefix = "Mint"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.store.accounts_file, "/tmp/accounts.json");
        assert_eq!(config.api.post_url, "https://example.com/posts");
        assert_eq!(config.mint.template, "mint me");
    }

    #[test]
    fn test_partial_config_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\naccounts_file = \"/tmp/a.json\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.store.accounts_file, "/tmp/a.json");
        assert_eq!(config.api.post_url, ApiConfig::default().post_url);
        assert_eq!(config.mint.title_prefix, "MBC-20 Mint: CLAW");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml {{{").unwrap();

        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        std::env::set_var("MOLTCAST_CONFIG", "/tmp/moltcast-test.toml");
        let path = resolve_config_path().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/moltcast-test.toml"));
        std::env::remove_var("MOLTCAST_CONFIG");
    }
}

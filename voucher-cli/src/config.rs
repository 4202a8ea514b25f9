//! CLI configuration file handling.
//!
//! Settings live in `voucher-ops/config.toml` under the platform config
//! directory; the access token can also come from the `VOUCHER_TOKEN`
//! environment variable, which wins over the file.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the voucher backend
    pub base_url: String,

    /// Bearer token for API requests
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    fn path() -> anyhow::Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| anyhow!("no config directory available"))?;
        Ok(dir.join("voucher-ops").join("config.toml"))
    }

    /// Load the config file, if present; local development defaults apply
    /// otherwise.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path()?;
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Config {
                base_url: "http://127.0.0.1:8000".to_string(),
                token: None,
            }
        };

        if let Ok(token) = std::env::var("VOUCHER_TOKEN") {
            config.token = Some(token);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_minimal_file() {
        let config: Config = toml::from_str("base_url = \"https://api.example.com\"").unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert!(config.token.is_none());
    }
}

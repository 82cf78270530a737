use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{Result, ToudiError};

/// Tracker and credential settings. Defaults point at the ruanyf/weekly
/// tracker; a config file and CLI flags override them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "owner/name" slug of the tracked repository.
    pub repo: String,
    pub api_base: String,
    /// Environment variable the API token is read from. Unset or empty
    /// means anonymous requests with the lower rate limit.
    pub token_env: String,
    /// Initial sort key name. Unknown names keep accumulated order.
    pub sort: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: "ruanyf/weekly".to_string(),
            api_base: "https://api.github.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            sort: "newest".to_string(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("toudi").join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "ignoring malformed config file");
                Config::default()
            }
        }
    }

    /// Split the configured slug, rejecting anything but "owner/name".
    pub fn split_repo(&self) -> Result<(&str, &str)> {
        match self.repo.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok((owner, name))
            }
            _ => Err(ToudiError::Config(format!(
                "repository must be \"owner/name\", got {:?}",
                self.repo
            ))),
        }
    }

    /// Read the token from the configured environment variable. Blank
    /// values count as absent.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
repo = "rust-lang/this-week-in-rust"
api_base = "https://github.example.com/api/v3"
token_env = "MY_TOKEN"
sort = "oldest"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.repo, "rust-lang/this-week-in-rust");
        assert_eq!(config.api_base, "https://github.example.com/api/v3");
        assert_eq!(config.token_env, "MY_TOKEN");
        assert_eq!(config.sort, "oldest");
    }

    #[test]
    fn partial_config_keeps_defaults_for_the_rest() {
        let config: Config = toml::from_str(r#"sort = "most-commented""#).unwrap();
        assert_eq!(config.repo, "ruanyf/weekly");
        assert_eq!(config.api_base, "https://api.github.com");
        assert_eq!(config.token_env, "GITHUB_TOKEN");
        assert_eq!(config.sort, "most-commented");
    }

    #[test]
    fn empty_config_is_the_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.repo, Config::default().repo);
    }

    #[test]
    fn split_repo_accepts_owner_slash_name() {
        let config = Config::default();
        assert_eq!(config.split_repo().unwrap(), ("ruanyf", "weekly"));
    }

    #[test]
    fn split_repo_rejects_malformed_slugs() {
        for repo in ["", "weekly", "/weekly", "ruanyf/", "a/b/c"] {
            let config = Config {
                repo: repo.to_string(),
                ..Config::default()
            };
            assert!(config.split_repo().is_err(), "accepted {repo:?}");
        }
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::upstream::RetryPolicy;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub spotify: SpotifyConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

/// Controls how much of an error is shown on the error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

/// Timeout and retry settings shared by both upstream sections.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl UpstreamSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_tmdb_image_base_url")]
    pub image_base_url: String,
    #[serde(flatten)]
    pub upstream: UpstreamSettings,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_base_url(),
            image_base_url: default_tmdb_image_base_url(),
            upstream: UpstreamSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_spotify_accounts_url")]
    pub accounts_url: String,
    #[serde(default = "default_spotify_api_url")]
    pub api_url: String,
    #[serde(flatten)]
    pub upstream: UpstreamSettings,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            accounts_url: default_spotify_accounts_url(),
            api_url: default_spotify_api_url(),
            upstream: UpstreamSettings::default(),
        }
    }
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    250
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3/".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w342".to_string()
}

fn default_spotify_accounts_url() -> String {
    "https://accounts.spotify.com/".to_string()
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com/".to_string()
}

pub const ENV_TMDB_API_KEY: &str = "TMDB_API_KEY";
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(&content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, all-defaults config.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
    }

    /// Overrides the upstream secrets with values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = non_empty(ENV_TMDB_API_KEY) {
            self.tmdb.api_key = key;
        }
        if let Some(id) = non_empty(ENV_CLIENT_ID) {
            self.spotify.client_id = id;
        }
        if let Some(secret) = non_empty(ENV_CLIENT_SECRET) {
            self.spotify.client_secret = secret;
        }
    }

    /// Names of the secrets that are still empty after loading.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.tmdb.api_key.is_empty() {
            missing.push("tmdb.api_key");
        }
        if self.spotify.client_id.is_empty() {
            missing.push("spotify.client_id");
        }
        if self.spotify.client_secret.is_empty() {
            missing.push("spotify.client_secret");
        }
        missing
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.listen.port, "3000");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3/");
        assert_eq!(config.spotify.accounts_url, "https://accounts.spotify.com/");
        assert_eq!(config.tmdb.upstream.max_retries, 2);
        assert!(!config.is_development());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
listen:
  address: 127.0.0.1
  port: "8080"
environment: development
tmdb:
  api_key: tmdb-key
  timeout_secs: 3
  max_retries: 0
spotify:
  client_id: id
  client_secret: secret
  api_url: http://localhost:9000/
  backoff_ms: 10
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.listen.port, "8080");
        assert!(config.is_development());
        assert_eq!(config.tmdb.api_key, "tmdb-key");
        assert_eq!(config.tmdb.upstream.timeout_secs, 3);
        assert_eq!(config.tmdb.upstream.max_retries, 0);
        assert_eq!(config.spotify.api_url, "http://localhost:9000/");
        assert_eq!(config.spotify.upstream.backoff_ms, 10);
        assert_eq!(config.spotify.upstream.timeout_secs, 10);
        assert!(config.missing_secrets().is_empty());
    }

    #[test]
    fn test_retry_policy_from_settings() {
        let settings = UpstreamSettings {
            timeout_secs: 5,
            max_retries: 4,
            backoff_ms: 100,
        };
        let policy = settings.retry_policy();
        assert_eq!(policy.timeout, Duration::from_secs(5));
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
    }

    #[test]
    fn test_env_overrides_replace_secrets() {
        let env: HashMap<&str, &str> = [
            (ENV_TMDB_API_KEY, "from-env"),
            (ENV_CLIENT_ID, "env-id"),
            (ENV_CLIENT_SECRET, ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::from_yaml("spotify:\n  client_secret: file-secret\n").unwrap();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.tmdb.api_key, "from-env");
        assert_eq!(config.spotify.client_id, "env-id");
        // empty values do not clobber the file
        assert_eq!(config.spotify.client_secret, "file-secret");
    }

    #[test]
    fn test_missing_secrets_listed() {
        let config = Config::default();
        assert_eq!(
            config.missing_secrets(),
            vec!["tmdb.api_key", "spotify.client_id", "spotify.client_secret"]
        );
    }

    #[test]
    fn test_invalid_environment_rejected() {
        assert!(Config::from_yaml("environment: staging\n").is_err());
    }
}

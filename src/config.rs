//! Configuration system for the Google Search agent
//!
//! Two kinds of configuration live here:
//! - Server and upstream settings, loaded from an optional TOML file and
//!   overridable from the command line.
//! - Search credentials, which are never stored in the file. They are read
//!   from a [`SecretSource`] on every tool invocation, so a misconfigured
//!   deployment fails on first use rather than at boot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable holding the Custom Search API key
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment variable holding the Custom Search engine identifier (`cx`)
pub const GOOGLE_CSE_ID_ENV: &str = "GOOGLE_CSE_ID";

/// Default upstream endpoint for the Custom Search JSON API
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Main agent configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub server: ServerSection,
    pub search: SearchSection,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    /// Interface to bind (default: all interfaces)
    pub listen: String,
    /// TCP port to bind
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Upstream search API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSection {
    /// Base URL of the Custom Search JSON API
    pub endpoint: String,
    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl SearchSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("environment variables GOOGLE_API_KEY and GOOGLE_CSE_ID must be set")]
    MissingCredentials,
}

impl AgentConfig {
    /// Load configuration from a TOML file, filling missing fields with defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AgentConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidConfig(
                "server.port must be between 1 and 65535".to_string(),
            ));
        }

        if self.search.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "search.timeout_secs must be greater than zero".to_string(),
            ));
        }

        validate_endpoint(&self.search.endpoint)
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.listen, self.server.port)
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint).map_err(|e| {
        ConfigError::InvalidConfig(format!("search.endpoint '{endpoint}' is not a valid URL: {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidConfig(format!(
            "search.endpoint must use http or https, got '{scheme}'"
        ))),
    }
}

/// Where credentials come from at invocation time
pub trait SecretSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the process environment on every lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SecretSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl SecretSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Credentials for one Custom Search call
#[derive(Clone, PartialEq, Eq)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
}

impl SearchCredentials {
    /// Resolve both credentials, trimmed; fails if either ends up empty
    pub fn resolve(source: &dyn SecretSource) -> Result<Self, ConfigError> {
        let api_key = trim_secret(source.get(GOOGLE_API_KEY_ENV).as_deref());
        let engine_id = trim_secret(source.get(GOOGLE_CSE_ID_ENV).as_deref());

        if api_key.is_empty() || engine_id.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        Ok(Self { api_key, engine_id })
    }
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("api_key", &"***")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

/// Strip surrounding whitespace and control characters (stray CR/LF from secret mounts)
fn trim_secret(value: Option<&str>) -> String {
    value
        .unwrap_or_default()
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();

        assert_eq!(config.server.listen, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search.endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.search.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AgentConfig = toml::from_str(
            r#"
[server]
port = 9090
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.listen, "0.0.0.0");
        assert_eq!(config.search.timeout_secs, 10);
    }

    #[test]
    fn test_bind_address() {
        let mut config = AgentConfig::default();
        config.server.listen = "127.0.0.1".to_string();
        config.server.port = 3000;

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = AgentConfig::default();
        config.server.port = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let mut config = AgentConfig::default();
        config.search.endpoint = "ftp://example.com/search".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = AgentConfig::default();
        config.search.timeout_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_resolve_trims_whitespace_and_control_chars() {
        let source = secrets(&[
            (GOOGLE_API_KEY_ENV, "  dummy-key\r\n"),
            (GOOGLE_CSE_ID_ENV, "\tdummy-cx\u{0}"),
        ]);

        let creds = SearchCredentials::resolve(&source).unwrap();
        assert_eq!(creds.api_key, "dummy-key");
        assert_eq!(creds.engine_id, "dummy-cx");
    }

    #[test]
    fn test_credentials_missing_key() {
        let source = secrets(&[(GOOGLE_CSE_ID_ENV, "dummy-cx")]);

        let err = SearchCredentials::resolve(&source).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
        assert!(err.to_string().contains(GOOGLE_API_KEY_ENV));
        assert!(err.to_string().contains(GOOGLE_CSE_ID_ENV));
        assert!(err.to_string().contains("must be set"));
    }

    #[test]
    fn test_credentials_whitespace_only_counts_as_missing() {
        let source = secrets(&[(GOOGLE_API_KEY_ENV, "key"), (GOOGLE_CSE_ID_ENV, " \n ")]);

        assert!(SearchCredentials::resolve(&source).is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_api_key() {
        let creds = SearchCredentials {
            api_key: "super-secret".to_string(),
            engine_id: "cx".to_string(),
        };

        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("cx"));
    }
}

//! Connection settings for a Tilores instance

use super::credentials::DEFAULT_SCOPES;
use anyhow::{Context, Result};
use derive_builder::Builder;
use std::time::Duration;

pub const ENV_API_URL: &str = "TILORES_API_URL";
pub const ENV_TOKEN_URL: &str = "TILORES_TOKEN_URL";
pub const ENV_CLIENT_ID: &str = "TILORES_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "TILORES_CLIENT_SECRET";
/// Optional, space separated
pub const ENV_SCOPE: &str = "TILORES_SCOPE";

#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into))]
pub struct ClientConfig {
    pub api_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    #[builder(default = "default_scopes()")]
    pub scopes: Vec<String>,
    #[builder(default = "Duration::from_secs(30)")]
    pub timeout: Duration,
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read the settings from `TILORES_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Environment variable {} is not set", key))
        };

        let mut builder = Self::builder();
        builder
            .api_url(require(ENV_API_URL)?)
            .token_url(require(ENV_TOKEN_URL)?)
            .client_id(require(ENV_CLIENT_ID)?)
            .client_secret(require(ENV_CLIENT_SECRET)?);

        if let Some(scope) = lookup(ENV_SCOPE) {
            builder.scopes(parse_scopes(&scope));
        }

        builder.build().context("Invalid client configuration")
    }
}

pub fn parse_scopes(scope: &str) -> Vec<String> {
    scope.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let vars = env(&[
            (ENV_API_URL, "https://api"),
            (ENV_TOKEN_URL, "https://token"),
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.api_url, "https://api");
        assert_eq!(config.scopes, default_scopes());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_lookup_scope_override() {
        let vars = env(&[
            (ENV_API_URL, "https://api"),
            (ENV_TOKEN_URL, "https://token"),
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_SCOPE, "tilores/query.search  tilores/query.entity"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(
            config.scopes,
            vec!["tilores/query.search", "tilores/query.entity"]
        );
    }

    #[test]
    fn test_from_lookup_missing_variable() {
        let vars = env(&[(ENV_API_URL, "https://api")]);
        let err = ClientConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_TOKEN_URL));
    }

    #[test]
    fn test_builder_requires_credentials() {
        let result = ClientConfig::builder().api_url("https://api").build();
        assert!(result.is_err());
    }
}

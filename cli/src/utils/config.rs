use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tilores_sdk::ClientConfig;
use tilores_sdk::client::config::{
    ENV_API_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_SCOPE, ENV_TOKEN_URL, parse_scopes,
};
use tilores_sdk::client::credentials::DEFAULT_SCOPES;

pub const CONFIG_FILE: &str = "tilores.yaml";

/// Project configuration stored in `tilores.yaml`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TiloresConfig {
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub token_url: String,
    #[serde(default)]
    pub client_id: String,
    /// Better left to `TILORES_CLIENT_SECRET`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Where `tilores generate` reads the schema and writes the models
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CodegenConfig {
    pub src_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("."),
            out_dir: PathBuf::from("src/generated"),
        }
    }
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for TiloresConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            token_url: String::new(),
            client_id: String::new(),
            client_secret: None,
            scopes: default_scopes(),
            timeout_secs: default_timeout_secs(),
            codegen: CodegenConfig::default(),
        }
    }
}

impl TiloresConfig {
    /// Load configuration from a project directory
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref().join(CONFIG_FILE);

        if !config_path.exists() {
            return Err(anyhow!(
                "Configuration file not found at: {}",
                config_path.display()
            ));
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: TiloresConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Save configuration into a project directory
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref().join(CONFIG_FILE);

        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Apply `TILORES_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup(ENV_API_URL) {
            self.api_url = api_url;
        }
        if let Some(token_url) = lookup(ENV_TOKEN_URL) {
            self.token_url = token_url;
        }
        if let Some(client_id) = lookup(ENV_CLIENT_ID) {
            self.client_id = client_id;
        }
        if let Some(client_secret) = lookup(ENV_CLIENT_SECRET) {
            self.client_secret = Some(client_secret);
        }
        if let Some(scope) = lookup(ENV_SCOPE) {
            self.scopes = parse_scopes(&scope);
        }
    }

    /// Check that everything needed to reach an instance is present
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(anyhow!("API URL is not configured (set {})", ENV_API_URL));
        }
        if self.token_url.is_empty() {
            return Err(anyhow!("Token URL is not configured (set {})", ENV_TOKEN_URL));
        }
        if self.client_id.is_empty() {
            return Err(anyhow!("Client id is not configured (set {})", ENV_CLIENT_ID));
        }
        if self.client_secret.as_deref().unwrap_or_default().is_empty() {
            return Err(anyhow!(
                "Client secret is not configured (set {})",
                ENV_CLIENT_SECRET
            ));
        }
        if self.scopes.is_empty() {
            return Err(anyhow!("At least one scope is required"));
        }
        Ok(())
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        self.validate()?;
        ClientConfig::builder()
            .api_url(self.api_url.as_str())
            .token_url(self.token_url.as_str())
            .client_id(self.client_id.as_str())
            .client_secret(self.client_secret.clone().unwrap_or_default())
            .scopes(self.scopes.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .context("Invalid client configuration")
    }
}

/// Loads the project configuration and layers the environment over it
pub struct ConfigManager {
    project_config: Option<TiloresConfig>,
    project_path: PathBuf,
}

impl ConfigManager {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_config: None,
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Load `tilores.yaml` if the project has one
    pub fn load(&mut self) -> Result<()> {
        if self.project_path.join(CONFIG_FILE).exists() {
            self.project_config = Some(TiloresConfig::load_from_path(&self.project_path)?);
        }
        Ok(())
    }

    pub fn get_project_config(&self) -> Option<&TiloresConfig> {
        self.project_config.as_ref()
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// The project configuration with environment variable overrides
    pub fn get_effective_config(&self) -> TiloresConfig {
        self.effective_config_with(|key| std::env::var(key).ok())
    }

    pub fn effective_config_with<F>(&self, lookup: F) -> TiloresConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.project_config.clone().unwrap_or_default();
        config.apply_overrides(lookup);
        config
    }

    /// Find the project root by looking for `tilores.yaml`
    pub fn find_project_root<P: AsRef<Path>>(start_path: P) -> Option<PathBuf> {
        let mut current = start_path.as_ref().to_path_buf();

        loop {
            if current.join(CONFIG_FILE).exists() {
                return Some(current);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }
}

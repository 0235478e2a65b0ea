use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cleaner::RetryPolicy;
use crate::error::{GmailError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the OAuth2 credentials JSON file
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
    /// Path where access tokens are cached between runs
    #[serde(default = "default_token_cache_path")]
    pub token_cache_path: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            token_cache_path: default_token_cache_path(),
        }
    }
}

/// Backoff settings for retrying chunk deletes on transient failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_token_cache_path() -> PathBuf {
    PathBuf::from(".gmail-clean/token.json")
}

fn default_initial_delay_secs() -> u64 {
    1
}

fn default_max_delay_secs() -> u64 {
    32
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GmailError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| GmailError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retry.initial_delay_secs == 0 {
            return Err(GmailError::ValidationError(
                "retry.initial_delay_secs must be at least 1".to_string(),
            ));
        }

        if self.retry.max_delay_secs < self.retry.initial_delay_secs {
            return Err(GmailError::ValidationError(format!(
                "retry.max_delay_secs ({}) must not be below retry.initial_delay_secs ({})",
                self.retry.max_delay_secs, self.retry.initial_delay_secs
            )));
        }

        Ok(())
    }

    /// Retry policy for the deletion pipeline
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_secs(self.retry.initial_delay_secs),
            max_delay: Duration::from_secs(self.retry.max_delay_secs),
        }
    }

    /// Write a commented example configuration file
    pub async fn create_example(path: &Path) -> Result<()> {
        let example = r#"# gmail-clean configuration

[auth]
# Path to the OAuth2 credentials downloaded from Google Cloud Console
credentials_path = "credentials.json"
# Where the access token is cached between runs
token_cache_path = ".gmail-clean/token.json"

[retry]
# Backoff after a rate-limited or failed batch delete, in seconds.
# The delay doubles per failed attempt up to the maximum.
initial_delay_secs = 1
max_delay_secs = 32
"#;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    GmailError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        tokio::fs::write(path, example)
            .await
            .map_err(|e| GmailError::ConfigError(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Wrote example configuration to {:?}", path);
        Ok(())
    }
}

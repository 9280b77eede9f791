//! API client configuration with environment variable priority
//!
//! Configuration is resolved in this order (first found wins):
//! 1. Environment variables (TEAMNET_*)
//! 2. Config file (teamnet.toml)
//! 3. Default values (where applicable)

use std::env;
use std::path::Path;

use serde::Deserialize;

/// Environment variable prefix
const ENV_PREFIX: &str = "TEAMNET";

/// Cloudflare v4 API root
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API configuration (parsed from TOML, can be overridden by env)
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// API token with Cloudflare Tunnel edit permissions
    pub api_token: Option<String>,

    /// File containing the API token
    pub api_token_file: Option<String>,

    /// API root URL
    pub base_url: Option<String>,

    /// Default account for route operations
    pub account_id: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Resolved API configuration with the actual token value
#[derive(Debug, Clone)]
pub struct ResolvedApiConfig {
    pub api_token: String,
    pub base_url: String,
    pub account_id: Option<String>,
    pub timeout_secs: u64,
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{}_{}", ENV_PREFIX, name)).ok()
}

fn read_token_file(path: &str) -> anyhow::Result<String> {
    let token = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read API token file {}: {}", path, e))?;
    Ok(token.trim().to_string())
}

impl ApiConfig {
    /// Load configuration from a TOML file (optional)
    pub fn load(path: &str) -> Self {
        if Path::new(path).exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path, e);
                }
            }
        }
        Self::default()
    }

    /// Resolve configuration from environment variables first, then config file
    pub fn resolve(self) -> anyhow::Result<ResolvedApiConfig> {
        // API token: ENV > ENV_FILE > config > config file > required
        let api_token = match get_env("API_TOKEN") {
            Some(token) => token.trim().to_string(),
            None => match get_env("API_TOKEN_FILE") {
                Some(path) => read_token_file(&path)?,
                None => match (self.api_token, self.api_token_file) {
                    (Some(token), _) => token.trim().to_string(),
                    (None, Some(path)) => read_token_file(&path)?,
                    (None, None) => anyhow::bail!(
                        "API token required. Set TEAMNET_API_TOKEN, TEAMNET_API_TOKEN_FILE, or api_token in config"
                    ),
                },
            },
        };

        if api_token.is_empty() {
            anyhow::bail!("API token is empty");
        }

        // Base URL: ENV > config > default
        let base_url = get_env("BASE_URL")
            .or(self.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Account ID: ENV > config > none (may be given per command)
        let account_id = get_env("ACCOUNT_ID")
            .or(self.account_id)
            .filter(|id| !id.is_empty());

        // Timeout: ENV > config > default 30s
        let timeout_secs = get_env("TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .or(self.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(ResolvedApiConfig {
            api_token,
            base_url,
            account_id,
            timeout_secs,
        })
    }

    /// Load config file and resolve with environment variable overrides
    pub fn load_and_resolve(path: &str) -> anyhow::Result<ResolvedApiConfig> {
        let config = Self::load(path);
        config.resolve()
    }
}
